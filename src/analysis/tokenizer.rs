/// Splits text into words on runs of ASCII space characters.
///
/// Leading, trailing and repeated spaces produce no empty tokens. Tokens
/// are zero-copy views into `text`. Only 0x20 separates words; control
/// bytes never reach this function because every text-accepting entry
/// point validates with [`contains_control_bytes`] first.
pub fn split_into_words(text: &str) -> Vec<&str> {
    text.split(' ').filter(|word| !word.is_empty()).collect()
}

/// True if any byte of `text` falls in [0x00, 0x1F]
pub fn contains_control_bytes(text: &str) -> bool {
    text.bytes().any(|byte| byte <= 0x1F)
}
