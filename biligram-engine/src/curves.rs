//! Tabulated threshold curves and the piecewise-linear lookup shared by both tables.

/// Where a curve's samples sit on the hours-of-life axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleGrid {
    pub start_hours: f64,
    pub interval_hours: f64,
}

impl SampleGrid {
    pub const fn new(start_hours: f64, interval_hours: f64) -> Self {
        Self {
            start_hours,
            interval_hours,
        }
    }

    /// Left sample index for `age_hours` and the age coordinate used as its x value.
    ///
    /// The coordinate is aligned to the interval from hour 0, not from `start_hours`.
    pub fn anchor(&self, age_hours: f64) -> Anchor {
        let index = ((age_hours - self.start_hours) / self.interval_hours).floor() as i64;
        let x0 = (age_hours / self.interval_hours).floor() * self.interval_hours;
        Anchor { index, x0 }
    }
}

/// Interpolation anchor: the left sample index and its x coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    pub index: i64,
    pub x0: f64,
}

/// Bilirubin levels (mg/dL) sampled at a fixed interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdCurve {
    pub samples: &'static [f64],
    pub grid: SampleGrid,
}

impl ThresholdCurve {
    pub const fn new(samples: &'static [f64], grid: SampleGrid) -> Self {
        Self { samples, grid }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Sample at `index`, or `None` outside the table.
    pub fn sample(&self, index: i64) -> Option<f64> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.samples.get(i).copied())
    }

    /// Hours of life represented by sample `index`.
    pub fn age_at(&self, index: usize) -> f64 {
        self.grid.start_hours + index as f64 * self.grid.interval_hours
    }

    /// Threshold at `age_hours` between the anchor sample and its right neighbour.
    ///
    /// Past the last sample the line continues flat. `None` when the anchor itself has no sample.
    pub fn interpolate(&self, anchor: Anchor, age_hours: f64) -> Option<f64> {
        let y0 = self.sample(anchor.index)?;
        let y1 = self.sample(anchor.index + 1).unwrap_or(y0);
        Some(y0 + (age_hours - anchor.x0) * ((y1 - y0) / self.grid.interval_hours))
    }

    /// Threshold at `age_hours` without any edge clamping.
    pub fn threshold_at(&self, age_hours: f64) -> Option<f64> {
        self.interpolate(self.grid.anchor(age_hours), age_hours)
    }

    /// `(age_hours, level)` pairs for plotting.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.samples
            .iter()
            .enumerate()
            .map(|(index, level)| (self.age_at(index), *level))
    }
}
