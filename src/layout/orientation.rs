//! Layout orientation: flow-axis switching and per-range orientation sections

use std::ops::Range;

use serde::{Deserialize, Serialize};
use smallvec::{smallvec, SmallVec};

use crate::error::{LayoutError, Result};
use crate::layout::container::MultiPageContainer;
use crate::layout::engine::TextLayoutEngine;
use crate::layout::page_setup::Orientation;

/// A contiguous document range sharing one orientation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrientationSection {
    /// Byte range in the document text
    pub range: Range<usize>,
    pub orientation: Orientation,
}

impl OrientationSection {
    pub fn new(range: Range<usize>, orientation: Orientation) -> Self {
        Self { range, orientation }
    }
}

pub type SectionList = SmallVec<[OrientationSection; 4]>;

/// Tracks the document orientation and its orientation sections
#[derive(Debug, Clone)]
pub struct LayoutOrientationController {
    orientation: Orientation,
    sections: SectionList,
    document_len: usize,
}

impl LayoutOrientationController {
    pub fn new(orientation: Orientation, document_len: usize) -> Self {
        Self {
            orientation,
            sections: smallvec![OrientationSection::new(0..document_len, orientation)],
            document_len,
        }
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn sections(&self) -> &[OrientationSection] {
        &self.sections
    }

    /// Switch the flow axis.
    ///
    /// Returns `Ok(false)` when `orientation` is already current. When the text
    /// layout engine cannot handle it, the last known good orientation stays
    /// in effect.
    pub fn set_orientation<E: TextLayoutEngine + ?Sized>(
        &mut self,
        orientation: Orientation,
        container: &mut MultiPageContainer,
        engine: &E,
    ) -> Result<bool> {
        if orientation == self.orientation {
            return Ok(false);
        }
        if !engine.supports_orientation(orientation) {
            log::warn!(
                "text layout engine rejected {:?}, keeping {:?}",
                orientation,
                self.orientation
            );
            return Err(LayoutError::UnsupportedOrientation(orientation));
        }

        // Sections that only restated the old document orientation follow it
        if self.is_uniform() {
            self.sections = smallvec![OrientationSection::new(0..self.document_len, orientation)];
        }
        self.orientation = orientation;
        container.set_orientation(orientation);
        log::debug!("layout orientation now {:?}", orientation);
        Ok(true)
    }

    /// Replace the section list.
    ///
    /// A list with gaps, overlaps, empty sections or incomplete coverage of
    /// `0..document_len` is rejected and replaced by a single whole-document
    /// section in the current orientation.
    pub fn set_sections(
        &mut self,
        sections: impl IntoIterator<Item = OrientationSection>,
        document_len: usize,
    ) -> Result<()> {
        let sections: SectionList = sections.into_iter().collect();
        self.document_len = document_len;
        match Self::validate(&sections, document_len) {
            Ok(()) => {
                self.sections = sections;
                Ok(())
            }
            Err(err) => {
                log::warn!("{}; falling back to a single section", err);
                self.sections = smallvec![OrientationSection::new(
                    0..document_len,
                    self.orientation
                )];
                Err(err)
            }
        }
    }

    fn validate(sections: &[OrientationSection], document_len: usize) -> Result<()> {
        let mut expected_start = 0;
        for section in sections {
            if section.range.start != expected_start {
                let kind = if section.range.start > expected_start {
                    "gap"
                } else {
                    "overlap"
                };
                return Err(LayoutError::InvalidSectionList(format!(
                    "{} at offset {}",
                    kind, expected_start
                )));
            }
            if section.range.end <= section.range.start && document_len > 0 {
                return Err(LayoutError::InvalidSectionList(format!(
                    "empty section at offset {}",
                    section.range.start
                )));
            }
            expected_start = section.range.end;
        }
        if sections.is_empty() || expected_start != document_len {
            return Err(LayoutError::InvalidSectionList(format!(
                "sections cover 0..{} but the document is {} long",
                expected_start, document_len
            )));
        }
        Ok(())
    }

    /// Orientation of the section containing byte `offset`
    pub fn orientation_at(&self, offset: usize) -> Orientation {
        let idx = self
            .sections
            .partition_point(|section| section.range.end <= offset);
        self.sections
            .get(idx)
            .or_else(|| self.sections.last())
            .map(|section| section.orientation)
            .unwrap_or(self.orientation)
    }

    /// Keep sections covering the document after its length changed.
    ///
    /// Sections past the new end are dropped and the last one is stretched or
    /// trimmed to end exactly at `document_len`.
    pub fn document_length_changed(&mut self, document_len: usize) {
        self.document_len = document_len;
        self.sections
            .retain(|section| section.range.start < document_len || section.range.start == 0);
        match self.sections.last_mut() {
            Some(last) => last.range.end = document_len,
            None => self
                .sections
                .push(OrientationSection::new(0..document_len, self.orientation)),
        }
    }

    fn is_uniform(&self) -> bool {
        self.sections
            .iter()
            .all(|section| section.orientation == self.orientation)
    }
}
