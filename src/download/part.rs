use crate::download::request::ByteRange;
use crate::file::FileDescriptor;

/// One contiguous slice of a file, downloaded as an independent transfer.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct PartSpec {
    pub index: usize,
    pub offset: u64,
    pub size: u64,
    pub name: String,
}

impl PartSpec {
    pub fn range(&self) -> ByteRange {
        ByteRange::new(self.offset, self.size)
    }
}

/// Splits `file` into `count` ceiling-sized parts. The last part is truncated to fit, and
/// trailing parts are empty when the file has fewer bytes than there are parts.
pub fn split(file: &FileDescriptor, count: usize) -> Vec<PartSpec> {
    let count = count.max(1);
    let standard_size = file.size.div_ceil(count as u64);
    (0..count)
        .map(|index| {
            let offset = (index as u64 * standard_size).min(file.size);
            let size = standard_size.min(file.size - offset);
            PartSpec {
                index,
                offset,
                size,
                name: part_name(&file.name, index),
            }
        })
        .collect()
}

fn part_name(file_name: &str, index: usize) -> String {
    format!("{} (part {})", file_name, index + 1)
}
