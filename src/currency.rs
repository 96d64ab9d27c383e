//! Formats amounts of money as Indonesian Rupiah for display.

use std::sync::OnceLock;

use numfmt::{Formatter, Precision};

/// Format `number` as Rupiah rounded to a whole number, e.g. "Rp1,500,000".
///
/// Amounts of one trillion or more are written in scientific notation, e.g.
/// "Rp1e15", as numfmt does for numbers that large.
pub fn format_currency(number: f64) -> String {
    static POSITIVE_FMT: OnceLock<Formatter> = OnceLock::new();

    let positive_fmt = POSITIVE_FMT.get_or_init(|| {
        Formatter::currency("Rp")
            .expect("\"Rp\" is a short enough currency prefix")
            .precision(Precision::Decimals(0))
    });

    static NEGATIVE_FMT: OnceLock<Formatter> = OnceLock::new();

    let negative_fmt = NEGATIVE_FMT.get_or_init(|| {
        Formatter::currency("-Rp")
            .expect("\"-Rp\" is a short enough currency prefix")
            .precision(Precision::Decimals(0))
    });

    let number = number.round();

    if number < 0.0 {
        negative_fmt.fmt_string(number.abs())
    } else if number > 0.0 {
        positive_fmt.fmt_string(number)
    } else {
        // Zero is hardcoded as "0", so we must specify the formatted string for zero
        "Rp0".to_owned()
    }
}
