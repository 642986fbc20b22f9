//! Well data sources.
//!
//! The layout engine does not care where wells come from; callers hand it
//! a [`WellSource`] and a list of ids. Database, file, and test-fixture
//! sources all implement the same capability and are composed at the call
//! site.

use std::collections::BTreeMap;

use crate::errors::LayoutError;
use crate::types::{Guide, LayoutConfig, SectionStyle, WellId, WellPoint};
use crate::{layout, LayoutRequest, LayoutResult};

/// Capability to resolve well ids into well records.
///
/// A missing diameter is an attribute-level gap the layout fills with a
/// default; a missing well is structural and must surface as
/// [`LayoutError::UnknownWell`], never be silently dropped.
pub trait WellSource {
    fn fetch_wells(&self, ids: &[WellId]) -> Result<Vec<WellPoint>, LayoutError>;
}

/// In-memory source over a fixed set of wells.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    wells: BTreeMap<WellId, WellPoint>,
}

impl MemorySource {
    pub fn new(wells: impl IntoIterator<Item = WellPoint>) -> MemorySource {
        MemorySource {
            wells: wells.into_iter().map(|w| (w.id.clone(), w)).collect(),
        }
    }

    pub fn insert(&mut self, well: WellPoint) {
        self.wells.insert(well.id.clone(), well);
    }

    pub fn len(&self) -> usize {
        self.wells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wells.is_empty()
    }
}

impl WellSource for MemorySource {
    fn fetch_wells(&self, ids: &[WellId]) -> Result<Vec<WellPoint>, LayoutError> {
        ids.iter()
            .map(|id| {
                self.wells
                    .get(id)
                    .cloned()
                    .ok_or_else(|| LayoutError::UnknownWell { id: id.clone() })
            })
            .collect()
    }
}

/// Fetch the named wells from `source` and lay them out.
pub fn layout_from_source<S: WellSource + ?Sized>(
    source: &S,
    ids: &[WellId],
    style: SectionStyle,
    guide: Guide,
    config: LayoutConfig,
) -> Result<LayoutResult, LayoutError> {
    let wells = source.fetch_wells(ids)?;
    layout(LayoutRequest {
        wells,
        style,
        guide,
        config,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> MemorySource {
        MemorySource::new([
            WellPoint::new("b-2", 5.0, 0.0),
            WellPoint::new("a-1", 0.0, 0.0),
            WellPoint::new("c-3", 10.0, 0.0),
        ])
    }

    #[test]
    fn fetch_returns_wells_in_request_order() {
        let src = fixture();
        let ids = [WellId::from("c-3"), WellId::from("a-1")];
        let wells = src.fetch_wells(&ids).unwrap();
        assert_eq!(wells.len(), 2);
        assert_eq!(wells[0].id.as_str(), "c-3");
        assert_eq!(wells[1].id.as_str(), "a-1");
    }

    #[test]
    fn unknown_id_surfaces_as_typed_error() {
        let src = fixture();
        let ids = [WellId::from("a-1"), WellId::from("ghost")];
        let res = src.fetch_wells(&ids);
        match res {
            Err(LayoutError::UnknownWell { id }) => assert_eq!(id.as_str(), "ghost"),
            other => panic!("expected UnknownWell, got {other:?}"),
        }
    }

    #[test]
    fn layout_from_source_runs_the_pipeline() {
        let src = fixture();
        let ids = [
            WellId::from("b-2"),
            WellId::from("a-1"),
            WellId::from("c-3"),
        ];
        let result = layout_from_source(
            &src,
            &ids,
            SectionStyle::Fence,
            Guide::none(),
            LayoutConfig::default(),
        )
        .unwrap();
        let order: Vec<&str> = result.placed.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(order, ["a-1", "b-2", "c-3"]);
    }
}
