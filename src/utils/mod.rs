pub mod constants;
pub mod path_utils;

pub use constants::*;
pub use path_utils::{
    dirname, join_url_path, normalize_asset_key, normalize_path, posix_relative, to_slash,
};
