use log::debug;
use std::collections::HashMap;

use crate::config::TargetHeaders;
use crate::error::FillError;
use crate::sheet::CellValue;

/// Header text -> 1-based column position, built from a sheet's first row.
#[derive(Clone, Debug, Default)]
pub struct HeaderMap {
    positions: HashMap<String, u16>,
}

impl HeaderMap {
    /// Scan a header row and record every non-blank header.
    ///
    /// Header text is trimmed before it is stored. When the same header
    /// appears twice, the rightmost occurrence wins.
    ///
    /// # Arguments
    /// * `header_row` - Cells of the first sheet row, leftmost first
    ///
    /// # Returns
    /// * `HeaderMap` - Mapping usable with [`HeaderMap::position`]
    pub fn resolve(header_row: &[CellValue]) -> Self {
        let mut positions = HashMap::new();
        for (idx, cell) in header_row.iter().enumerate() {
            if cell.is_blank() {
                continue;
            }
            let Ok(col) = u16::try_from(idx + 1) else {
                break;
            };
            let text = cell.as_text().trim().to_string();
            if let Some(prev) = positions.insert(text.clone(), col) {
                debug!("header '{}' repeated at columns {} and {}", text, prev, col);
            }
        }
        HeaderMap { positions }
    }

    pub fn position(&self, header: &str) -> Option<u16> {
        self.positions.get(header.trim()).copied()
    }

    pub fn contains(&self, header: &str) -> bool {
        self.position(header).is_some()
    }

    /// The subset of `required` that this header row lacks, in the given order.
    pub fn missing(&self, required: &[&str]) -> Vec<String> {
        required
            .iter()
            .filter(|h| !self.contains(h))
            .map(|h| h.trim().to_string())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Resolved 1-based positions of the five derived columns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TargetColumns {
    pub style_code: u16,
    pub color: u16,
    pub size: u16,
    pub image_code: u16,
    pub process_type: u16,
}

impl TargetColumns {
    /// Look up every target header in `headers`.
    ///
    /// # Errors
    /// * `FillError::MissingTargetColumns` naming every absent header
    pub fn resolve(headers: &HeaderMap, targets: &TargetHeaders) -> Result<Self, FillError> {
        let missing = headers.missing(&targets.as_array());
        if !missing.is_empty() {
            return Err(FillError::MissingTargetColumns(missing));
        }

        let pos = |h: &str| headers.position(h).unwrap_or_default();
        Ok(TargetColumns {
            style_code: pos(&targets.style_code),
            color: pos(&targets.color),
            size: pos(&targets.size),
            image_code: pos(&targets.image_code),
            process_type: pos(&targets.process_type),
        })
    }

    /// Positions in output order: style, color, size, image, process.
    pub fn as_array(&self) -> [u16; 5] {
        [
            self.style_code,
            self.color,
            self.size,
            self.image_code,
            self.process_type,
        ]
    }
}
