const BYTES_PER_MEGABYTE: f64 = 1024.0 * 1024.0;

/// Sizes are always shown in megabytes with two decimals.
pub fn format_megabytes(size: u64) -> String {
    format!("{:.2} MB", size as f64 / BYTES_PER_MEGABYTE)
}

pub fn format_thousands(value: u32) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    grouped
}

pub fn format_currency(value: u32) -> String {
    format!("${}", format_thousands(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn megabytes_use_two_decimals() {
        assert_eq!(format_megabytes(1_048_576), "1.00 MB");
        assert_eq!(format_megabytes(2_621_440), "2.50 MB");
        assert_eq!(format_megabytes(0), "0.00 MB");
    }

    #[test]
    fn thousands_are_grouped() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(40_000), "40,000");
        assert_eq!(format_thousands(1_234_567), "1,234,567");
        assert_eq!(format_currency(40_000), "$40,000");
    }
}
