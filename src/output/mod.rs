pub mod formatter;

pub use formatter::{
    format_enrichment_report, format_listing_detail, format_price, format_score,
    format_scored_table, format_tsv, should_use_colors,
};
