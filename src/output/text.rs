//! Plain text report.
//!
//! Each duplicate set is printed as its digest on one line followed by the
//! member paths, indented by two spaces, in walk order:
//!
//! ```text
//! 5d41402abc4b2a76b9719d911017c592
//!   /tmp/a.txt
//!   /tmp/b.txt
//! ```

use std::io::{self, Write};

use yansi::Paint;

use crate::duplicates::{DuplicateGroups, ScanSummary};

/// Text renderer for duplicate groups.
#[derive(Debug)]
pub struct TextOutput<'a> {
    groups: &'a DuplicateGroups,
    color: bool,
}

impl<'a> TextOutput<'a> {
    /// Create a renderer; `color` makes digest headers bold.
    #[must_use]
    pub fn new(groups: &'a DuplicateGroups, color: bool) -> Self {
        Self { groups, color }
    }

    /// Write the report.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        for group in self.groups {
            let header = group.digest.to_hex();
            if self.color {
                writeln!(writer, "{}", header.bold())?;
            } else {
                writeln!(writer, "{header}")?;
            }
            for file in &group.files {
                writeln!(writer, "  {}", file.path.display())?;
            }
        }
        Ok(())
    }

    /// Render the report to a string.
    #[must_use]
    pub fn render(&self) -> String {
        let mut buffer = Vec::new();
        // Writing to a Vec cannot fail.
        let _ = self.write_to(&mut buffer);
        String::from_utf8_lossy(&buffer).into_owned()
    }
}

/// Multi-line human-readable scan summary.
#[must_use]
pub fn render_summary(summary: &ScanSummary) -> String {
    let mut lines = vec![
        format!(
            "Scanned {} file(s), {} in {} root(s)",
            summary.total_files,
            summary.total_size_display(),
            summary.roots.len()
        ),
        format!(
            "{} duplicate group(s), {} file(s), {} reclaimable",
            summary.duplicate_groups,
            summary.duplicate_files,
            summary.reclaimable_display()
        ),
    ];
    if summary.has_errors() {
        lines.push(format!("{} path(s) skipped:", summary.scan_errors.len()));
        lines.extend(summary.scan_errors.iter().map(|e| format!("  {e}")));
    }
    lines.push(format!("Elapsed: {:?}", summary.scan_duration));
    lines.join("\n")
}
