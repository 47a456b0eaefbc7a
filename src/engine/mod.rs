pub mod mask;
pub mod policy;
pub mod unmask;

pub const MASK_GLYPH: char = '_';
