//! # FEI/TIA .ser 容器解析器
//!
//! 读取电镜 TIA 软件写出的小端序列容器（series 文件），取出第一个
//! 二维图像元素的像素标定与原始像素阵列。
//!
//! ## 文件布局
//! ```text
//! ByteOrder(i16)=0x4949  SeriesID(i16)=0x0197  SeriesVersion(i16)
//! DataTypeID(i32)        TagTypeID(i32)
//! TotalNumberElements(i32)  ValidNumberElements(i32)
//! OffsetArrayOffset(i32, 版本 ≥ 0x0220 时为 i64)
//! NumberDimensions(i32)  维度记录 × N  偏移数组  数据元素...
//! ```
//! 二维数据元素：X/Y 标定（offset f64, delta f64, element i32）、
//! DataType(i16)、ArraySizeX(i32)、ArraySizeY(i32)、像素数据。
//! 标定以米为单位（TIA 约定）。
//!
//! ## 依赖关系
//! - 被 `tem/scalebar.rs` 使用
//! - 使用 `models/calibration.rs`
//! - 使用 `byteorder` 读取小端数据

use std::fs;
use std::io::{Cursor, Read, Seek, SeekFrom};
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt};

use crate::error::{LabError, Result};
use crate::models::PixelCalibration;

/// .ser 文件魔数：'II'（小端）
const SER_BYTE_ORDER: i16 = 0x4949;
/// series 标识
const SER_SERIES_ID: i16 = 0x0197;
/// 偏移数组使用 64 位偏移的最低版本
const SER_VERSION_LONG_OFFSETS: i16 = 0x0220;
/// 二维图像元素的 DataTypeID
const SER_DATATYPE_2D: i32 = 0x4122;

/// 原始像素阵列，按 .ser 元素的样本类型保存
#[derive(Debug, Clone)]
pub enum RawImage {
    U8(Vec<u8>),
    U16(Vec<u16>),
    U32(Vec<u32>),
    I8(Vec<i8>),
    I16(Vec<i16>),
    I32(Vec<i32>),
    F32(Vec<f32>),
    F64(Vec<f64>),
}

impl RawImage {
    /// 像素个数
    pub fn len(&self) -> usize {
        match self {
            RawImage::U8(v) => v.len(),
            RawImage::U16(v) => v.len(),
            RawImage::U32(v) => v.len(),
            RawImage::I8(v) => v.len(),
            RawImage::I16(v) => v.len(),
            RawImage::I32(v) => v.len(),
            RawImage::F32(v) => v.len(),
            RawImage::F64(v) => v.len(),
        }
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// 从 .ser 容器中取出的二维图像
#[derive(Debug, Clone)]
pub struct SerImage {
    /// 像素标定（pixel_size 为 X 方向标定步长）
    pub calibration: PixelCalibration,
    /// 图像宽度（像素）
    pub width: u32,
    /// 图像高度（像素）
    pub height: u32,
    /// 原始像素阵列，按行存储
    pub data: RawImage,
}

/// 解析 .ser 文件
pub fn parse_ser_file(path: &Path) -> Result<SerImage> {
    let bytes = fs::read(path).map_err(|e| LabError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_ser_bytes(&bytes, &path.display().to_string())
}

/// 从字节缓冲解析 .ser 容器
pub fn parse_ser_bytes(bytes: &[u8], path_label: &str) -> Result<SerImage> {
    let err = |reason: String| LabError::ParseError {
        format: "ser".to_string(),
        path: path_label.to_string(),
        reason,
    };
    let trunc = |_| err("truncated file".to_string());

    let mut r = Cursor::new(bytes);

    let byte_order = r.read_i16::<LittleEndian>().map_err(trunc)?;
    if byte_order != SER_BYTE_ORDER {
        return Err(err(format!("bad byte-order tag 0x{:04x}", byte_order)));
    }
    let series_id = r.read_i16::<LittleEndian>().map_err(trunc)?;
    if series_id != SER_SERIES_ID {
        return Err(err(format!("bad series id 0x{:04x}", series_id)));
    }
    let version = r.read_i16::<LittleEndian>().map_err(trunc)?;

    let data_type_id = r.read_i32::<LittleEndian>().map_err(trunc)?;
    if data_type_id != SER_DATATYPE_2D {
        return Err(err(format!(
            "only 2-D image series are supported (DataTypeID 0x{:04x})",
            data_type_id
        )));
    }
    let _tag_type_id = r.read_i32::<LittleEndian>().map_err(trunc)?;
    let _total_elements = r.read_i32::<LittleEndian>().map_err(trunc)?;
    let valid_elements = r.read_i32::<LittleEndian>().map_err(trunc)?;
    if valid_elements < 1 {
        return Err(err("no valid data elements".to_string()));
    }

    let offset_array_offset = if version >= SER_VERSION_LONG_OFFSETS {
        r.read_i64::<LittleEndian>().map_err(trunc)?
    } else {
        i64::from(r.read_i32::<LittleEndian>().map_err(trunc)?)
    };

    // 维度记录：单位字符串可能带 SI 词头（如 "nm"），缺省按米处理
    let n_dims = r.read_i32::<LittleEndian>().map_err(trunc)?;
    let mut dim_unit = String::new();
    for _ in 0..n_dims.max(0) {
        let _size = r.read_i32::<LittleEndian>().map_err(trunc)?;
        let _cal_offset = r.read_f64::<LittleEndian>().map_err(trunc)?;
        let _cal_delta = r.read_f64::<LittleEndian>().map_err(trunc)?;
        let _cal_element = r.read_i32::<LittleEndian>().map_err(trunc)?;
        let desc_len = r.read_i32::<LittleEndian>().map_err(trunc)?;
        skip(&mut r, desc_len).map_err(trunc)?;
        let units_len = r.read_i32::<LittleEndian>().map_err(trunc)?;
        let units = read_string(&mut r, units_len).map_err(trunc)?;
        if dim_unit.is_empty() {
            dim_unit = units;
        }
    }

    // 偏移数组的第一个条目指向第一个数据元素
    r.seek(SeekFrom::Start(offset_array_offset as u64))
        .map_err(trunc)?;
    let first_element = if version >= SER_VERSION_LONG_OFFSETS {
        r.read_i64::<LittleEndian>().map_err(trunc)?
    } else {
        i64::from(r.read_i32::<LittleEndian>().map_err(trunc)?)
    };
    r.seek(SeekFrom::Start(first_element as u64)).map_err(trunc)?;

    // 二维数据元素头
    let _cal_offset_x = r.read_f64::<LittleEndian>().map_err(trunc)?;
    let cal_delta_x = r.read_f64::<LittleEndian>().map_err(trunc)?;
    let _cal_element_x = r.read_i32::<LittleEndian>().map_err(trunc)?;
    let _cal_offset_y = r.read_f64::<LittleEndian>().map_err(trunc)?;
    let _cal_delta_y = r.read_f64::<LittleEndian>().map_err(trunc)?;
    let _cal_element_y = r.read_i32::<LittleEndian>().map_err(trunc)?;
    let sample_type = r.read_i16::<LittleEndian>().map_err(trunc)?;
    let width = r.read_i32::<LittleEndian>().map_err(trunc)?;
    let height = r.read_i32::<LittleEndian>().map_err(trunc)?;

    if width <= 0 || height <= 0 {
        return Err(err(format!("bad image dimensions {}x{}", width, height)));
    }
    let count = width as usize * height as usize;

    let data = read_samples(&mut r, sample_type, count)
        .map_err(|reason| err(reason))?;

    Ok(SerImage {
        calibration: PixelCalibration {
            pixel_size: cal_delta_x,
            unit: normalize_unit(&dim_unit),
        },
        width: width as u32,
        height: height as u32,
        data,
    })
}

/// 按元素样本类型读取像素数据
fn read_samples(
    r: &mut Cursor<&[u8]>,
    sample_type: i16,
    count: usize,
) -> std::result::Result<RawImage, String> {
    let trunc = |_| "truncated pixel data".to_string();
    macro_rules! read_vec {
        ($variant:ident, $read:ident) => {{
            let mut v = Vec::with_capacity(count);
            for _ in 0..count {
                v.push(r.$read::<LittleEndian>().map_err(trunc)?);
            }
            Ok(RawImage::$variant(v))
        }};
    }

    match sample_type {
        1 => {
            let mut v = vec![0u8; count];
            r.read_exact(&mut v).map_err(trunc)?;
            Ok(RawImage::U8(v))
        }
        2 => read_vec!(U16, read_u16),
        3 => read_vec!(U32, read_u32),
        4 => {
            let mut v = vec![0u8; count];
            r.read_exact(&mut v).map_err(trunc)?;
            Ok(RawImage::I8(v.into_iter().map(|b| b as i8).collect()))
        }
        5 => read_vec!(I16, read_i16),
        6 => read_vec!(I32, read_i32),
        7 => read_vec!(F32, read_f32),
        8 => read_vec!(F64, read_f64),
        other => Err(format!("unsupported sample type {}", other)),
    }
}

/// 读取定长字符串（非 UTF-8 字节按替换字符处理）
fn read_string(r: &mut Cursor<&[u8]>, len: i32) -> std::io::Result<String> {
    let mut buf = vec![0u8; len.max(0) as usize];
    r.read_exact(&mut buf)?;
    Ok(String::from_utf8_lossy(&buf).trim().to_string())
}

/// 跳过定长字段
fn skip(r: &mut Cursor<&[u8]>, len: i32) -> std::io::Result<()> {
    r.seek(SeekFrom::Current(i64::from(len.max(0))))?;
    Ok(())
}

/// 单位字符串规范化：形如 词头+"m" 的保留，其余按 TIA 约定视为米
fn normalize_unit(units: &str) -> String {
    if units.len() <= 2 && units.ends_with('m') {
        units.to_string()
    } else {
        "m".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use byteorder::WriteBytesExt;

    /// 构造一个最小的 0x0210 版本 .ser 容器：1 个维度、1 个 2x2 u16 元素
    fn synthetic_ser(pixel_size: f64) -> Vec<u8> {
        use std::io::Write;

        let mut dim = Vec::new();
        dim.write_i32::<LittleEndian>(1).unwrap(); // DimensionSize
        dim.write_f64::<LittleEndian>(0.0).unwrap(); // CalibrationOffset
        dim.write_f64::<LittleEndian>(1.0).unwrap(); // CalibrationDelta
        dim.write_i32::<LittleEndian>(0).unwrap(); // CalibrationElement
        dim.write_i32::<LittleEndian>(0).unwrap(); // DescriptionLength
        dim.write_i32::<LittleEndian>(1).unwrap(); // UnitsLength
        dim.write_all(b"m").unwrap();

        // 头部（i32 偏移版本）: 2+2+2+4+4+4+4+4+4 = 30 字节
        let header_len = 30usize;
        let offset_array_at = header_len + dim.len();
        let element_at = offset_array_at + 4;

        let mut out = Vec::new();
        out.write_i16::<LittleEndian>(SER_BYTE_ORDER).unwrap();
        out.write_i16::<LittleEndian>(SER_SERIES_ID).unwrap();
        out.write_i16::<LittleEndian>(0x0210).unwrap();
        out.write_i32::<LittleEndian>(SER_DATATYPE_2D).unwrap();
        out.write_i32::<LittleEndian>(0x4152).unwrap(); // TagTypeID
        out.write_i32::<LittleEndian>(1).unwrap(); // TotalNumberElements
        out.write_i32::<LittleEndian>(1).unwrap(); // ValidNumberElements
        out.write_i32::<LittleEndian>(offset_array_at as i32).unwrap();
        out.write_i32::<LittleEndian>(1).unwrap(); // NumberDimensions
        out.extend_from_slice(&dim);
        out.write_i32::<LittleEndian>(element_at as i32).unwrap();

        // 数据元素
        out.write_f64::<LittleEndian>(0.0).unwrap(); // CalibrationOffsetX
        out.write_f64::<LittleEndian>(pixel_size).unwrap(); // CalibrationDeltaX
        out.write_i32::<LittleEndian>(0).unwrap();
        out.write_f64::<LittleEndian>(0.0).unwrap(); // CalibrationOffsetY
        out.write_f64::<LittleEndian>(pixel_size).unwrap();
        out.write_i32::<LittleEndian>(0).unwrap();
        out.write_i16::<LittleEndian>(2).unwrap(); // u16 样本
        out.write_i32::<LittleEndian>(2).unwrap(); // ArraySizeX
        out.write_i32::<LittleEndian>(2).unwrap(); // ArraySizeY
        for v in [10u16, 20, 30, 40] {
            out.write_u16::<LittleEndian>(v).unwrap();
        }
        out
    }

    #[test]
    fn test_parse_synthetic_ser() {
        let bytes = synthetic_ser(2e-9);
        let image = parse_ser_bytes(&bytes, "test").unwrap();
        assert_eq!(image.width, 2);
        assert_eq!(image.height, 2);
        assert!((image.calibration.pixel_size - 2e-9).abs() < 1e-24);
        assert_eq!(image.calibration.unit, "m");
        match &image.data {
            RawImage::U16(v) => assert_eq!(v, &vec![10, 20, 30, 40]),
            other => panic!("unexpected sample type: {:?}", other),
        }
    }

    #[test]
    fn test_bad_magic_rejected() {
        let mut bytes = synthetic_ser(1e-9);
        bytes[0] = 0;
        assert!(parse_ser_bytes(&bytes, "test").is_err());
    }

    #[test]
    fn test_truncated_rejected() {
        let bytes = synthetic_ser(1e-9);
        assert!(parse_ser_bytes(&bytes[..bytes.len() - 3], "test").is_err());
    }
}
