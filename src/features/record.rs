use serde::Serialize;

/// Declares a flat record whose column list and value order come from the
/// same field list, so headers and rows cannot drift apart.
macro_rules! feature_record {
    (
        $(#[$meta:meta])*
        pub struct $name:ident {
            $( $(#[$fmeta:meta])* $field:ident : $ty:ty ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        pub struct $name {
            $( $(#[$fmeta])* pub $field: $ty ),*
        }

        impl $name {
            /// Column names in serialization order.
            pub const COLUMNS: &'static [&'static str] = &[$(stringify!($field)),*];

            /// Field values rendered as text, in `COLUMNS` order.
            pub fn values(&self) -> Vec<String> {
                vec![$(self.$field.to_string()),*]
            }
        }
    };
}

feature_record! {
    /// Every positional feature of one position, computed before the
    /// candidate move is played. Fields that depend on the acting player
    /// (`center_control`, `space_advantage`, `knight_outposts`,
    /// `passed_pawn_advancement`) are relative to that colour.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
    pub struct FeatureRecord {
        white_material: f32,
        black_material: f32,
        material_imbalance: f32,
        minor_piece_imbalance: u8,

        white_castling_rights_remaining: u8,
        black_castling_rights_remaining: u8,
        white_king_pawn_shield: u32,
        black_king_pawn_shield: u32,

        white_isolated_pawns: u32,
        white_doubled_pawns: u32,
        white_backward_pawns: u32,
        white_passed_pawns: u32,
        white_connected_pawns: u32,
        black_isolated_pawns: u32,
        black_doubled_pawns: u32,
        black_backward_pawns: u32,
        black_passed_pawns: u32,
        black_connected_pawns: u32,

        center_control: u32,
        open_files: u32,
        white_semi_open_files: u32,
        black_semi_open_files: u32,
        space_advantage: i32,

        white_piece_mobility: u32,
        black_piece_mobility: u32,
        white_piece_activity: u32,
        black_piece_activity: u32,
        white_coordination: u32,
        black_coordination: u32,
        white_attacked_pieces: u32,
        white_hanging_pieces: u32,
        black_attacked_pieces: u32,
        black_hanging_pieces: u32,
        white_king_center_distance: u32,
        black_king_center_distance: u32,

        white_bishop_pair: u8,
        black_bishop_pair: u8,
        knight_outposts: u32,
        white_rooks_on_seventh: u32,
        white_pawn_majority: u32,
        black_pawn_majority: u32,
        passed_pawn_advancement: u32,
    }
}
