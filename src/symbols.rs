// src/symbols.rs

use colored::{ColoredString, Colorize};
use std::sync::LazyLock;

pub static INFO: LazyLock<ColoredString> = LazyLock::new(|| "[i]".cyan());
pub static WARN: LazyLock<ColoredString> = LazyLock::new(|| "[!]".yellow());
