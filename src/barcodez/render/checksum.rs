/// Parses a string of ASCII digits, returning `None` on any other character.
pub fn digits(value: &str) -> Option<Vec<u8>> {
    value
        .chars()
        .map(|c| c.to_digit(10).map(|d| d as u8))
        .collect()
}

/// GS1 mod-10 check digit for a payload (the digits without the check digit).
///
/// Weights alternate 3, 1 starting from the rightmost payload digit.
pub fn gs1_check_digit(payload: &[u8]) -> u8 {
    let sum: u32 = payload
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &d)| u32::from(d) * if i % 2 == 0 { 3 } else { 1 })
        .sum();
    ((10 - (sum % 10)) % 10) as u8
}

/// Completes or verifies a GS1 number of `full_len` digits.
///
/// Accepts either the payload alone (`full_len - 1` digits, check digit is
/// appended) or the full number (check digit must match).
pub fn complete_gs1(value: &str, full_len: usize) -> Result<Vec<u8>, String> {
    let mut number = digits(value).ok_or_else(|| format!("\"{}\" must contain digits only", value))?;

    if number.len() == full_len - 1 {
        number.push(gs1_check_digit(&number));
        return Ok(number);
    }

    if number.len() != full_len {
        return Err(format!(
            "expected {} or {} digits, got {}",
            full_len - 1,
            full_len,
            number.len()
        ));
    }

    let expected = gs1_check_digit(&number[..full_len - 1]);
    let given = number[full_len - 1];
    if expected != given {
        return Err(format!(
            "invalid check digit {} (expected {})",
            given, expected
        ));
    }
    Ok(number)
}
