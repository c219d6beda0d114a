//! Small helpers for reading and writing kernel sysfs nodes.

use std::fs;
use std::io;
use std::path::Path;

pub fn read_to_string(path: &Path) -> Option<String> {
    fs::read_to_string(path).ok()
}

pub fn read_i32(path: &Path) -> Option<i32> {
    read_to_string(path)?.trim().parse().ok()
}

/// Write `value` followed by a newline, the way the kernel expects
/// single-value attribute writes.
pub fn write_line(path: &Path, value: &str) -> io::Result<()> {
    fs::write(path, format!("{value}\n"))
}

pub fn write_num(path: &Path, value: i32) -> io::Result<()> {
    write_line(path, &value.to_string())
}
