pub mod formatter;

pub use formatter::{
    format_banner, format_breakdown, format_index, format_json, format_model,
    format_record_table, format_result, rule, should_use_colors, ABOUT, INTRO, NOTE, REFERENCES,
    TITLE,
};
