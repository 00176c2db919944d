use ntlog_core::bail_invalid;
use ntlog_core::error::Result;

/// Parse a strictly positive entry count
pub fn parse_count(text: &str) -> Result<usize> {
    match text.trim().parse::<i64>() {
        Ok(n) if n > 0 => match usize::try_from(n) {
            Ok(n) => Ok(n),
            Err(_) => bail_invalid!(text, "number is too large"),
        },
        Ok(_) => bail_invalid!(text, "expected strictly positive number"),
        Err(_) => bail_invalid!(text, "could not convert to number"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count("3").unwrap(), 3);
        assert_eq!(parse_count(" 12 ").unwrap(), 12);
    }

    #[test]
    fn test_parse_count_errors() {
        assert_eq!(
            parse_count("infinity").unwrap_err().to_string(),
            "infinity: could not convert to number"
        );
        assert_eq!(
            parse_count("0").unwrap_err().to_string(),
            "0: expected strictly positive number"
        );
    }
}
