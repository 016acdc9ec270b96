//! Chart payload projection.

mod projector;

pub use projector::{
    available_chart_types, project, CategoryCount, ChartData, ChartKind, ChartPayload,
    ChartTypeDescriptor, ColumnSummary, CumulativePoint, ScatterPoint, SeriesPoint,
    DEFAULT_CHART_LIMIT,
};
