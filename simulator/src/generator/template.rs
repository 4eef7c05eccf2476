/// GS1 check digit for an EAN-13 (12 digit) or UPC-A (11 digit) payload.
pub fn gs1_check_digit(payload: &str) -> Option<u32> {
    if payload.is_empty() || !payload.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let sum: u32 = payload
        .bytes()
        .rev()
        .enumerate()
        .map(|(position, b)| {
            let digit = u32::from(b - b'0');
            if position % 2 == 0 {
                digit * 3
            } else {
                digit
            }
        })
        .sum();
    Some((10 - sum % 10) % 10)
}

/// Appends the check digit to an 11 (UPC-A) or 12 (EAN-13) digit payload.
pub fn with_check_digit(payload: &str) -> Option<String> {
    if !matches!(payload.len(), 11 | 12) {
        return None;
    }
    let check = gs1_check_digit(payload)?;
    Some(format!("{}{}", payload, check))
}
