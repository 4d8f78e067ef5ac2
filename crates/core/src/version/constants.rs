use std::fmt;
use std::str::FromStr;

use crate::model::VersionInfo;

pub const VERSION_CONSTANT: &str = "BOOTLOADER_VERSION";
pub const BRANCH_CONSTANT: &str = "BOOTLOADER_VERSION_BRANCH";
pub const COMMIT_HASH_CONSTANT: &str = "BOOTLOADER_VERSION_COMMIT_HASH";
pub const IS_DIRTY_CONSTANT: &str = "BOOTLOADER_VERSION_IS_DIRTY";

const HEADER_PREAMBLE: &str = "// Generated by fwstamp. Do not edit.\n#pragma once\n\n";

/// Value of a single build constant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstantValue {
    Str(String),
    /// Emitted as `0` / `1` so it works in `#if`.
    Flag(bool),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConstant {
    pub name: &'static str,
    pub value: ConstantValue,
}

/// Output syntax for the derived constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConstantsFormat {
    /// Compiler `-D` flags, one per line, shell-quoted.
    #[default]
    Flags,
    /// C header of `#define`s.
    Header,
    /// `cargo:rustc-env` lines for a Rust build script.
    Cargo,
    /// JSON object keyed by constant name.
    Json,
}

impl ConstantsFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConstantsFormat::Flags => "flags",
            ConstantsFormat::Header => "header",
            ConstantsFormat::Cargo => "cargo",
            ConstantsFormat::Json => "json",
        }
    }
}

impl fmt::Display for ConstantsFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConstantsFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "flags" => Ok(ConstantsFormat::Flags),
            "header" => Ok(ConstantsFormat::Header),
            "cargo" => Ok(ConstantsFormat::Cargo),
            "json" => Ok(ConstantsFormat::Json),
            other => Err(format!("Invalid format '{other}'. Allowed: flags, header, cargo, json")),
        }
    }
}

/// The four constants injected into the firmware build, in emission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConstants {
    pub entries: Vec<BuildConstant>,
}

impl BuildConstants {
    pub fn from_version(version: &VersionInfo) -> Self {
        let entries = vec![
            BuildConstant {
                name: VERSION_CONSTANT,
                value: ConstantValue::Str(version.version_string()),
            },
            BuildConstant {
                name: BRANCH_CONSTANT,
                value: ConstantValue::Str(version.branch.clone()),
            },
            BuildConstant {
                name: COMMIT_HASH_CONSTANT,
                value: ConstantValue::Str(version.commit_hash.clone()),
            },
            BuildConstant { name: IS_DIRTY_CONSTANT, value: ConstantValue::Flag(version.is_dirty) },
        ];
        Self { entries }
    }

    pub fn get(&self, name: &str) -> Option<&ConstantValue> {
        self.entries.iter().find(|c| c.name == name).map(|c| &c.value)
    }

    /// Render every constant in `format`. Line-based formats end with a newline.
    pub fn render(&self, format: ConstantsFormat) -> String {
        match format {
            ConstantsFormat::Flags => self.render_lines(|name, value| match value {
                ConstantValue::Str(s) => {
                    format!("-D {name}={}", shell_single_quote(&c_string_literal(s)))
                }
                ConstantValue::Flag(b) => format!("-D {name}={}", flag_digit(*b)),
            }),
            ConstantsFormat::Header => {
                let mut out = String::from(HEADER_PREAMBLE);
                out.push_str(&self.render_lines(|name, value| match value {
                    ConstantValue::Str(s) => format!("#define {name} {}", c_string_literal(s)),
                    ConstantValue::Flag(b) => {
                        format!("#define {name} {}", flag_digit(*b))
                    }
                }));
                out
            }
            ConstantsFormat::Cargo => self.render_lines(|name, value| match value {
                ConstantValue::Str(s) => format!("cargo:rustc-env={name}={s}"),
                ConstantValue::Flag(b) => {
                    format!("cargo:rustc-env={name}={}", flag_digit(*b))
                }
            }),
            ConstantsFormat::Json => {
                let mut map = serde_json::Map::new();
                for constant in &self.entries {
                    let value = match &constant.value {
                        ConstantValue::Str(s) => serde_json::Value::from(s.as_str()),
                        ConstantValue::Flag(b) => {
                            serde_json::Value::from(flag_digit(*b))
                        }
                    };
                    map.insert(constant.name.to_string(), value);
                }
                let mut out = serde_json::to_string_pretty(&serde_json::Value::Object(map))
                    .unwrap_or_else(|_| "{}".to_string());
                out.push('\n');
                out
            }
        }
    }

    fn render_lines(&self, line: impl Fn(&str, &ConstantValue) -> String) -> String {
        let mut out = String::new();
        for constant in &self.entries {
            out.push_str(&line(constant.name, &constant.value));
            out.push('\n');
        }
        out
    }
}

/// Quote `s` as a C string literal.
pub fn c_string_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            other => out.push(other),
        }
    }
    out.push('"');
    out
}

fn flag_digit(flag: bool) -> u8 {
    u8::from(flag)
}

/// Wrap `s` in single quotes for a POSIX shell.
fn shell_single_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "'\\''"))
}
