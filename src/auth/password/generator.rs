//! Salt generator module
//!
//! - `generate_salt`: Generates a random per-user salt
//! - `SALT_LENGTH`: Length of every generated salt. Kept a multiple of 4 so the
//!   salt is always a canonical unpadded B64 string for the PHC encoder.

use rand::distributions::Alphanumeric;
use rand::rngs::OsRng;
use rand::Rng;

pub const SALT_LENGTH: usize = 16;

pub fn generate_salt() -> String {
    OsRng.sample_iter(&Alphanumeric).take(SALT_LENGTH).map(char::from).collect()
}
