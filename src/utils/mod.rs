//! Small helpers shared by the API and the CLI.

pub mod format;
pub mod islamic;
pub mod validation;

use rand::distributions::Alphanumeric;
use rand::Rng;

pub use format::{
    calculate_percentage, format_currency, format_file_size, format_number, format_relative_time,
    slugify, truncate_text,
};
pub use islamic::{
    calculate_zakat, format_arabic_number, format_prayer_time, hijri_date, is_halal, nisab_value,
};
pub use validation::{is_valid_email, is_valid_url};

/// Default length of [`generate_id`].
pub const DEFAULT_ID_LENGTH: usize = 8;

/// Random alphanumeric identifier of `len` characters.
pub fn generate_id(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}
