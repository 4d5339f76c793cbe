mod apply;
mod changer;
mod config;
mod converter;
mod extract;
mod ordinal;
mod path_name;
mod planner;
mod template;

pub const DEFAULT_OLD_TEMPLATE: &str = r"IMG_\YYYY\MM\DD_\hh\mm\ss";
pub const DEFAULT_NEW_TEMPLATE: &str = r"\YYYY-\MM-\DD (\i)";

pub use apply::{apply_plan, move_file, ApplyResult};
pub use changer::BatchNameChanger;
pub use config::{
    app_paths, load_config, load_config_from, save_config, save_config_to, AppConfig, AppPaths,
};
pub use converter::TemplateConverter;
pub use extract::{extract_field_values, FieldValues};
pub use ordinal::OrdinalFormatter;
pub use path_name::PathName;
pub use planner::{
    collect_files, generate_plan, PlanOptions, RenameCandidate, RenamePlan, RenameStats, Strategy,
};
pub use template::{
    parse_field_spans, parse_template, render_template, validate_template, Field, FieldSpan,
    TemplateError, TemplatePart, ESCAPE,
};
