//! # SI 词头单位换算
//!
//! 固定词头指数表（mega=6 … pico=-12）与词头间十次幂换算因子。
//! 纯查表，无隐藏状态。
//!
//! ## 依赖关系
//! - 被 `tem/scalebar.rs` 和 `cli/tem.rs` 使用
//! - 无外部模块依赖

use std::fmt;

use crate::error::{LabError, Result};

/// SI 词头
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiPrefix {
    /// 10^6
    Mega,
    /// 10^3
    Kilo,
    /// 10^0（无词头，纯 "m"）
    Base,
    /// 10^-2
    Centi,
    /// 10^-3
    Milli,
    /// 10^-6
    Micro,
    /// 10^-9
    Nano,
    /// 10^-12
    Pico,
}

impl SiPrefix {
    /// 十次幂指数
    pub fn exponent(self) -> i32 {
        match self {
            SiPrefix::Mega => 6,
            SiPrefix::Kilo => 3,
            SiPrefix::Base => 0,
            SiPrefix::Centi => -2,
            SiPrefix::Milli => -3,
            SiPrefix::Micro => -6,
            SiPrefix::Nano => -9,
            SiPrefix::Pico => -12,
        }
    }

    /// 词头符号（无词头为空串）
    pub fn symbol(self) -> &'static str {
        match self {
            SiPrefix::Mega => "M",
            SiPrefix::Kilo => "K",
            SiPrefix::Base => "",
            SiPrefix::Centi => "c",
            SiPrefix::Milli => "m",
            SiPrefix::Micro => "u",
            SiPrefix::Nano => "n",
            SiPrefix::Pico => "p",
        }
    }

    /// 从词头符号解析，固定支持集之外报错
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "M" => Ok(SiPrefix::Mega),
            "K" => Ok(SiPrefix::Kilo),
            "" => Ok(SiPrefix::Base),
            "c" => Ok(SiPrefix::Centi),
            "m" => Ok(SiPrefix::Milli),
            "u" => Ok(SiPrefix::Micro),
            "n" => Ok(SiPrefix::Nano),
            "p" => Ok(SiPrefix::Pico),
            other => Err(LabError::UnsupportedUnit(other.to_string())),
        }
    }
}

impl fmt::Display for SiPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// 两个词头之间的换算因子：10^(given − convert)
pub fn unit_multiplier(given: SiPrefix, convert: SiPrefix) -> f64 {
    10f64.powi(given.exponent() - convert.exponent())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multiplier_round_trip() {
        let forward = unit_multiplier(SiPrefix::Nano, SiPrefix::Micro);
        let back = unit_multiplier(SiPrefix::Micro, SiPrefix::Nano);
        assert!((forward * back - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_multiplier_values() {
        // nm -> um: 10^-3
        assert!((unit_multiplier(SiPrefix::Nano, SiPrefix::Micro) - 1e-3).abs() < 1e-18);
        // m -> nm: 10^9
        assert!((unit_multiplier(SiPrefix::Base, SiPrefix::Nano) - 1e9).abs() < 1.0);
    }

    #[test]
    fn test_parse_supported_set() {
        assert_eq!(SiPrefix::parse("n").unwrap(), SiPrefix::Nano);
        assert_eq!(SiPrefix::parse("").unwrap(), SiPrefix::Base);
        assert!(SiPrefix::parse("x").is_err());
        assert!(SiPrefix::parse("nm").is_err());
    }
}
