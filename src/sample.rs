//! Simulation samples held as parallel numeric columns.

/// Columns of a simulation output file, in file order.
///
/// The position of each variant is the column's position in the CSV. The
/// header line is never consulted, so this order is the file contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    T,
    QueueLength,
    Active,
    Arrived,
    Handled,
    Completed,
    TimedOut,
    Rejected,
    AvgLatency,
    Slowdown,
    DropP,
}

impl Column {
    pub const COUNT: usize = 11;

    pub const ALL: [Column; Column::COUNT] = [
        Column::T,
        Column::QueueLength,
        Column::Active,
        Column::Arrived,
        Column::Handled,
        Column::Completed,
        Column::TimedOut,
        Column::Rejected,
        Column::AvgLatency,
        Column::Slowdown,
        Column::DropP,
    ];

    /// Zero-based field position in a data row
    pub fn index(self) -> usize {
        self as usize
    }

    /// Name as written in the simulator's header line
    pub fn name(self) -> &'static str {
        match self {
            Column::T => "t",
            Column::QueueLength => "queue_length",
            Column::Active => "active",
            Column::Arrived => "arrived",
            Column::Handled => "handled",
            Column::Completed => "completed",
            Column::TimedOut => "timed_out",
            Column::Rejected => "rejected",
            Column::AvgLatency => "avg_latency",
            Column::Slowdown => "slowdown",
            Column::DropP => "drop_p",
        }
    }
}

/// All samples of one simulation run.
///
/// Rows are only ever appended whole, so every column has the same length.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimulationSamples {
    columns: [Vec<f64>; Column::COUNT],
}

impl SimulationSamples {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one row, values in `Column::ALL` order
    pub fn push_row(&mut self, row: [f64; Column::COUNT]) {
        for (column, value) in self.columns.iter_mut().zip(row) {
            column.push(value);
        }
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.columns[Column::T.index()].len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn series(&self, column: Column) -> &[f64] {
        &self.columns[column.index()]
    }

    pub fn t(&self) -> &[f64] {
        self.series(Column::T)
    }
}
