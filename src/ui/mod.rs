pub mod output;
pub mod table;
pub mod theme;

pub use output::{
    error, extraction_report, header, is_quiet, quiet_from_env, section, set_quiet, success,
    summary_row,
};
pub use table::{TableBuilder, stats_table};
pub use theme::{palette, Palette};
