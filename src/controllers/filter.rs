//! Pure filtering and ordering of directory listings.

use std::cmp::Ordering;

use crate::domain::file::File;

const HIDDEN_FILE_PREFIX: char = '.';

/// Name comparison strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Sort {
    #[default]
    Az,
    Za,
}

impl Sort {
    fn compare(&self, a: &File, b: &File) -> Ordering {
        match self {
            Sort::Az => a.name.cmp(&b.name),
            Sort::Za => b.name.cmp(&a.name),
        }
    }
}

/// Filtering and ordering flags applied to a listing before rendering.
///
/// The transform is pure and deterministic: identical input, flags and
/// strategy always yield the identical ordering.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileFilter {
    pub sort: Sort,
    pub show_hidden_files: bool,
}

impl FileFilter {
    pub fn new(sort: Sort, show_hidden_files: bool) -> Self {
        Self {
            sort,
            show_hidden_files,
        }
    }

    fn is_hidden(file: &File) -> bool {
        file.name.starts_with(HIDDEN_FILE_PREFIX)
    }

    /// Directories first, then the chosen name ordering within each
    /// class. Hidden files are excluded unless enabled.
    pub fn filter<'a>(&self, files: &'a [File]) -> Vec<&'a File> {
        let mut selected: Vec<&File> = files
            .iter()
            .filter(|file| self.show_hidden_files || !Self::is_hidden(file))
            .collect();

        selected.sort_by(|a, b| match (a.is_directory(), b.is_directory()) {
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            _ => self.sort.compare(a, b),
        });

        selected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<File> {
        vec![
            File::new("1", ".hidden", "/"),
            File::new("2", "Zebra", "/"),
            File::new("3", "apple", "/"),
            File::new("4", "Folder", "/").into_directory(),
        ]
    }

    fn names(files: &[&File]) -> Vec<String> {
        files.iter().map(|file| file.name.clone()).collect()
    }

    #[test]
    fn test_directories_first_hidden_excluded() {
        let files = sample();
        let filter = FileFilter::new(Sort::Az, false);

        assert_eq!(names(&filter.filter(&files)), vec!["Folder", "Zebra", "apple"]);
    }

    #[test]
    fn test_show_hidden_files() {
        let files = sample();
        let filter = FileFilter::new(Sort::Az, true);

        assert_eq!(
            names(&filter.filter(&files)),
            vec!["Folder", ".hidden", "Zebra", "apple"]
        );
    }

    #[test]
    fn test_descending_sort_keeps_directories_first() {
        let files = sample();
        let filter = FileFilter::new(Sort::Za, false);

        assert_eq!(names(&filter.filter(&files)), vec!["Folder", "apple", "Zebra"]);
    }

    #[test]
    fn test_deterministic_for_identical_input() {
        let files = sample();
        let filter = FileFilter::new(Sort::Az, false);

        let first = names(&filter.filter(&files));
        let second = names(&filter.filter(&files));
        assert_eq!(first, second);
    }
}
