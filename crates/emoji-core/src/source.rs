//! Built-in raw emoji table backed by the Unicode emoji list in `emojis`.

use crate::catalog::RawEmoji;

/// Every emoji in the bundled Unicode data, skin-tone variants included,
/// in Unicode group order.
///
/// Variants are emitted right after their default form so the loader sees
/// the same shape of input a full emoji table would give it.
pub fn builtin_table() -> Vec<RawEmoji> {
    let mut rows = Vec::with_capacity(4096);
    for emoji in emojis::iter() {
        match emoji.skin_tones() {
            Some(variants) => {
                rows.extend(variants.map(|v| RawEmoji::new(v.as_str(), v.name())));
            }
            None => rows.push(RawEmoji::new(emoji.as_str(), emoji.name())),
        }
    }
    rows
}
