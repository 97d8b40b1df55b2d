mod citations;
mod streets;

pub use {
    citations::{CitationSet, DatasetError, load_citations, read_citations},
    streets::{StreetCatalog, StreetError, StreetSegment},
};
