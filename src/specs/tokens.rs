// src/specs/tokens.rs
//
// Positional tokenizer for one `<option>` item:
//
//   <option ...>Vendor Product(...) Note, $list[$sale] ...</option>
//
// Two boundaries are greedy on purpose: the product runs to the LAST `)`
// (trailing parenthetical specs belong to the name) and the price follows the
// LAST `$` (a sale price after the list price wins). Stored history was cut
// this way, so the rules stay as they are.

use crate::core::html::after_open_tag;
use crate::error::Result;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tokens<'a> {
    pub vendor: &'a str,
    pub product: &'a str,
    pub note: &'a str,
    pub price: u32,
}

/// Split an item region into vendor, product, note and price.
/// Any missing delimiter is a layout change upstream and fails loudly.
pub fn tokenize(item: &str) -> Result<Tokens<'_>> {
    let text = after_open_tag(item).ok_or_else(|| malformed!("'>' closing the opening tag", item))?;

    // Vendor up to the first space
    let sp = text.find(' ').ok_or_else(|| malformed!("space after vendor", item))?;
    let vendor = &text[..sp];
    if vendor.is_empty() { return Err(malformed!("vendor", item)); }
    let rest = &text[sp + 1..];

    // Product through the last ')'
    let close = rest.rfind(')').ok_or_else(|| malformed!("')' ending product", item))?;
    let product = &rest[..=close];
    let rest = &rest[close + 1..];

    // Note up to ", "
    let comma = rest.find(", ").ok_or_else(|| malformed!("', ' after note", item))?;
    let note = rest[..comma].trim();
    if note.is_empty() { return Err(malformed!("note", item)); }
    let rest = &rest[comma + 2..];

    // Price after the last '$', up to the next space
    let dollar = rest.rfind('$').ok_or_else(|| malformed!("'$' before price", item))?;
    let digits = &rest[dollar + 1..];
    let end = digits.find(' ').ok_or_else(|| malformed!("space after price", item))?;
    let price = parse_price(&digits[..end]).ok_or_else(|| malformed!("numeric price", item))?;

    Ok(Tokens { vendor, product, note, price })
}

/// Digits only; no sign, no separators.
fn parse_price(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) { return None; }
    s.parse().ok()
}
