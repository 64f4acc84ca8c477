//! # 比例尺元数据转移
//!
//! 把 .ser 容器中的像素标定换算成目标 SI 词头下的分辨率
//! （单位长度像素数），连同 ImageJ 风格描述写入 TIFF 头，
//! 使 ImageJ 等软件显示正确的比例尺。
//!
//! ## 写入的 TIFF 字段
//! - ImageDescription (270): `ImageJ=1.54m\nunit=<词头>m\n`
//! - NewSubfileType (254): 0
//! - ResolutionUnit (296): 1（无单位，分辨率按描述中的单位解释）
//! - SamplesPerPixel (277): 1
//! - XResolution/YResolution (282/283): 1 / (像素尺寸 × 换算因子)
//!
//! ## 依赖关系
//! - 被 `commands/tem/scalebar.rs` 调用
//! - 使用 `parsers/ser.rs` 的 SerImage, RawImage
//! - 使用 `tem/units.rs` 的换算表
//! - 使用 `tiff` 库编解码 TIFF

use std::fs::File;
use std::io::{BufReader, BufWriter, Seek, Write};
use std::path::{Path, PathBuf};

use tiff::decoder::{Decoder, DecodingResult};
use tiff::encoder::colortype;
use tiff::encoder::{ImageEncoder, Rational, TiffEncoder, TiffKind};
use tiff::tags::{ResolutionUnit, Tag};

use crate::error::{LabError, Result};
use crate::models::PixelCalibration;
use crate::parsers::ser::{RawImage, SerImage};
use crate::tem::units::{self, SiPrefix};

/// 目标词头下的分辨率（单位长度像素数）
pub fn resolution_for(calibration: &PixelCalibration, target: SiPrefix) -> Result<f64> {
    let given = SiPrefix::parse(calibration.prefix())?;
    let multiplier = units::unit_multiplier(given, target);
    let resolution = 1.0 / (calibration.pixel_size * multiplier);
    if !resolution.is_finite() || resolution <= 0.0 {
        return Err(LabError::InvalidArgument(format!(
            "pixel size {} {} gives no usable resolution",
            calibration.pixel_size, calibration.unit
        )));
    }
    Ok(resolution)
}

/// ImageJ 风格描述字段
pub fn image_description(target: SiPrefix) -> String {
    format!("ImageJ=1.54m\nunit={}m\n", target.symbol())
}

/// 浮点分辨率近似为 TIFF RATIONAL
///
/// 分母从 10^6 逐级缩小直到分子装入 u32。
pub fn float_to_rational(value: f64) -> Rational {
    let mut d: u32 = 1_000_000;
    while d > 1 && value * f64::from(d) > f64::from(u32::MAX) {
        d /= 10;
    }
    let n = (value * f64::from(d)).round().clamp(1.0, f64::from(u32::MAX));
    Rational { n: n as u32, d }
}

/// 把 .ser 的比例尺元数据转移到 TIFF
///
/// `tiff_path` 为 None 时在 .ser 同目录下创建同名 .tif（像素阵列
/// 取自容器本身），否则重编码给定的 TIFF 文件。返回写入的路径。
pub fn transfer_scalebar_metadata(
    ser: &SerImage,
    ser_path: &Path,
    tiff_path: Option<&Path>,
    target: SiPrefix,
) -> Result<PathBuf> {
    let resolution = resolution_for(&ser.calibration, target)?;

    match tiff_path {
        None => {
            let output = ser_path.with_extension("tif");
            write_tiff(&ser.data, ser.width, ser.height, resolution, target, &output)?;
            Ok(output)
        }
        Some(existing) => {
            let (data, width, height) = read_tiff(existing)?;
            write_tiff(&data, width, height, resolution, target, existing)?;
            Ok(existing.to_path_buf())
        }
    }
}

/// 读取已有 TIFF 的像素阵列与尺寸
fn read_tiff(path: &Path) -> Result<(RawImage, u32, u32)> {
    let file = File::open(path).map_err(|e| LabError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    let mut decoder = Decoder::new(BufReader::new(file))?;
    let (width, height) = decoder.dimensions()?;
    let data = match decoder.read_image()? {
        DecodingResult::U8(v) => RawImage::U8(v),
        DecodingResult::U16(v) => RawImage::U16(v),
        DecodingResult::U32(v) => RawImage::U32(v),
        DecodingResult::I8(v) => RawImage::I8(v),
        DecodingResult::I16(v) => RawImage::I16(v),
        DecodingResult::I32(v) => RawImage::I32(v),
        DecodingResult::F32(v) => RawImage::F32(v),
        DecodingResult::F64(v) => RawImage::F64(v),
        _ => {
            return Err(LabError::UnsupportedFormat(format!(
                "unsupported TIFF sample format in {}",
                path.display()
            )))
        }
    };
    Ok((data, width, height))
}

/// 写出带比例尺元数据的灰度 TIFF
///
/// 有符号整型阵列没有通行的 TIFF 灰度表示，转成 f32 写出。
fn write_tiff(
    data: &RawImage,
    width: u32,
    height: u32,
    resolution: f64,
    target: SiPrefix,
    output: &Path,
) -> Result<()> {
    if data.len() != width as usize * height as usize {
        return Err(LabError::InvalidArgument(format!(
            "pixel array length {} does not match {}x{}",
            data.len(),
            width,
            height
        )));
    }

    let file = File::create(output).map_err(|e| LabError::FileWriteError {
        path: output.display().to_string(),
        source: e,
    })?;
    let mut encoder = TiffEncoder::new(BufWriter::new(file))?;
    let rational = float_to_rational(resolution);
    let description = image_description(target);

    match data {
        RawImage::U8(v) => {
            let mut image = encoder.new_image::<colortype::Gray8>(width, height)?;
            apply_scalebar_tags(&mut image, rational, &description)?;
            image.write_data(v)?;
        }
        RawImage::U16(v) => {
            let mut image = encoder.new_image::<colortype::Gray16>(width, height)?;
            apply_scalebar_tags(&mut image, rational, &description)?;
            image.write_data(v)?;
        }
        RawImage::U32(v) => {
            let mut image = encoder.new_image::<colortype::Gray32>(width, height)?;
            apply_scalebar_tags(&mut image, rational, &description)?;
            image.write_data(v)?;
        }
        RawImage::F32(v) => {
            let mut image = encoder.new_image::<colortype::Gray32Float>(width, height)?;
            apply_scalebar_tags(&mut image, rational, &description)?;
            image.write_data(v)?;
        }
        RawImage::F64(v) => {
            let mut image = encoder.new_image::<colortype::Gray64Float>(width, height)?;
            apply_scalebar_tags(&mut image, rational, &description)?;
            image.write_data(v)?;
        }
        RawImage::I8(v) => {
            let converted: Vec<f32> = v.iter().map(|&s| f32::from(s)).collect();
            let mut image = encoder.new_image::<colortype::Gray32Float>(width, height)?;
            apply_scalebar_tags(&mut image, rational, &description)?;
            image.write_data(&converted)?;
        }
        RawImage::I16(v) => {
            let converted: Vec<f32> = v.iter().map(|&s| f32::from(s)).collect();
            let mut image = encoder.new_image::<colortype::Gray32Float>(width, height)?;
            apply_scalebar_tags(&mut image, rational, &description)?;
            image.write_data(&converted)?;
        }
        RawImage::I32(v) => {
            let converted: Vec<f32> = v.iter().map(|&s| s as f32).collect();
            let mut image = encoder.new_image::<colortype::Gray32Float>(width, height)?;
            apply_scalebar_tags(&mut image, rational, &description)?;
            image.write_data(&converted)?;
        }
    }

    Ok(())
}

/// 把比例尺字段写入图像目录
fn apply_scalebar_tags<W, C, K>(
    image: &mut ImageEncoder<'_, W, C, K>,
    resolution: Rational,
    description: &str,
) -> Result<()>
where
    W: Write + Seek,
    C: colortype::ColorType,
    K: TiffKind,
{
    image.resolution(
        ResolutionUnit::None,
        Rational {
            n: resolution.n,
            d: resolution.d,
        },
    );
    let dir = image.encoder();
    dir.write_tag(Tag::ImageDescription, description)?;
    dir.write_tag(Tag::NewSubfileType, 0u32)?;
    dir.write_tag(Tag::SamplesPerPixel, 1u16)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nm_calibration(pixel_size: f64) -> PixelCalibration {
        PixelCalibration {
            pixel_size,
            unit: "nm".to_string(),
        }
    }

    #[test]
    fn test_resolution_same_prefix() {
        // 2 nm/px -> 0.5 px/nm
        let res = resolution_for(&nm_calibration(2.0), SiPrefix::Nano).unwrap();
        assert!((res - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_resolution_meters_to_nano() {
        // TIA 以米标定：1e-9 m/px -> 1 px/nm
        let cal = PixelCalibration {
            pixel_size: 1e-9,
            unit: "m".to_string(),
        };
        let res = resolution_for(&cal, SiPrefix::Nano).unwrap();
        assert!((res - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_resolution_rejects_unknown_prefix() {
        let cal = PixelCalibration {
            pixel_size: 1.0,
            unit: "xm".to_string(),
        };
        assert!(resolution_for(&cal, SiPrefix::Nano).is_err());
    }

    #[test]
    fn test_image_description_unit() {
        assert_eq!(image_description(SiPrefix::Nano), "ImageJ=1.54m\nunit=nm\n");
        assert_eq!(image_description(SiPrefix::Base), "ImageJ=1.54m\nunit=m\n");
    }

    #[test]
    fn test_float_to_rational_ratio() {
        let r = float_to_rational(2.5);
        assert!((f64::from(r.n) / f64::from(r.d) - 2.5).abs() < 1e-6);

        // 大数值时分母缩小而不是溢出
        let big = float_to_rational(1.5e9);
        assert!(f64::from(big.n) / f64::from(big.d) > 1.4e9);
    }
}
