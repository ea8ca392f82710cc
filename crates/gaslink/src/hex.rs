use crate::exit::{CliError, CliResult};

/// Parse hex text such as `AA 55 03`, `aa5503` or `0xAA,0x55`.
///
/// Whitespace, commas, colons and dashes separate tokens; a `0x` prefix per
/// token is accepted.
pub fn parse_hex(input: &str) -> CliResult<Vec<u8>> {
    let mut bytes = Vec::new();

    for token in input
        .split(|c: char| c.is_whitespace() || matches!(c, ',' | ':' | '-'))
        .filter(|token| !token.is_empty())
    {
        let digits = token
            .strip_prefix("0x")
            .or_else(|| token.strip_prefix("0X"))
            .unwrap_or(token);
        if digits.is_empty() {
            return Err(CliError::usage(format!("invalid hex token {token:?}: no digits")));
        }

        let decoded = hex::decode(digits)
            .map_err(|err| CliError::usage(format!("invalid hex token {token:?}: {err}")))?;
        bytes.extend(decoded);
    }

    if bytes.is_empty() {
        return Err(CliError::usage("no hex bytes given"));
    }
    Ok(bytes)
}

/// Format bytes as space-separated upper-case hex.
pub fn format_hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|byte| hex::encode_upper([*byte]))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exit::USAGE;

    #[test]
    fn accepts_common_spellings() {
        let expected = vec![0xAA, 0x55, 0x03];
        assert_eq!(parse_hex("AA 55 03").unwrap(), expected);
        assert_eq!(parse_hex("aa5503").unwrap(), expected);
        assert_eq!(parse_hex("0xAA,0x55,0x03").unwrap(), expected);
        assert_eq!(parse_hex("aa:55-03\n").unwrap(), expected);
    }

    #[test]
    fn rejects_malformed_input() {
        assert_eq!(parse_hex("AA5").unwrap_err().code, USAGE);
        assert_eq!(parse_hex("ZZ").unwrap_err().code, USAGE);
        assert_eq!(parse_hex("  ").unwrap_err().code, USAGE);
        assert_eq!(parse_hex("0x").unwrap_err().code, USAGE);
        assert_eq!(parse_hex("+1").unwrap_err().code, USAGE);
        assert_eq!(parse_hex("AA G0").unwrap_err().code, USAGE);
    }

    #[test]
    fn error_message_names_the_token() {
        let err = parse_hex("AA 5G").unwrap_err();
        assert!(err.message.contains("\"5G\""));
        let err = parse_hex("0xABC").unwrap_err();
        assert!(err.message.contains("\"0xABC\""));
    }

    #[test]
    fn formats_upper_case_pairs() {
        assert_eq!(format_hex(&[0xAA, 0x05, 0xF5]), "AA 05 F5");
        assert_eq!(format_hex(&[]), "");
    }
}
