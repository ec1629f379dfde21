//! Yield curve analytics over an in-memory [`TimeSeriesTable`].
//!
//! Everything here is a pure transformation: the analytics borrow a table that
//! was fetched elsewhere and never touch the network.
//!
//! Missing inputs propagate as missing outputs, except the inversion flag,
//! which is always 0 or 1. Rolling statistics are computed over complete
//! windows only.

use crate::domain::{DerivedMetricTable, MetricColumn, TimeSeriesTable};
use crate::error::AppError;
use crate::math::{complete, fit_line, forward_fill, pearson, sample_std};

pub const DEFAULT_REGRESSION_WINDOW: usize = 30;
pub const DEFAULT_CORRELATION_WINDOW: usize = 60;
pub const DEFAULT_VOLATILITY_WINDOW: usize = 14;

pub struct YieldCurveAnalytics<'a> {
    table: &'a TimeSeriesTable,
}

impl<'a> YieldCurveAnalytics<'a> {
    pub fn new(table: &'a TimeSeriesTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &'a TimeSeriesTable {
        self.table
    }

    /// `spread = long - short`; `inversion_flag` is 1 when the spread is negative
    /// and 0 otherwise, including rows where the spread is missing.
    pub fn yield_curve_inversion(
        &self,
        short_id: &str,
        long_id: &str,
    ) -> Result<DerivedMetricTable, AppError> {
        let short = self.table.require_column(short_id)?;
        let long = self.table.require_column(long_id)?;

        let spread: Vec<Option<f64>> = short
            .iter()
            .zip(long)
            .map(|(s, l)| Some((*l)? - (*s)?))
            .collect();
        let flag = spread
            .iter()
            .map(|s| Some(if s.is_some_and(|v| v < 0.0) { 1.0 } else { 0.0 }))
            .collect();

        Ok(DerivedMetricTable::new(
            self.table.dates().to_vec(),
            vec![
                MetricColumn {
                    name: "spread",
                    values: spread,
                },
                MetricColumn {
                    name: "inversion_flag",
                    values: flag,
                },
            ],
        ))
    }

    /// OLS of `dependent_id` on `independent_id` over each window of `window` rows.
    ///
    /// Both columns are forward-filled first; rows still incomplete are dropped
    /// inside each window. Row `k` of the output covers input rows
    /// `[k, k + window)` and carries the date of the last of them.
    pub fn rolling_regression(
        &self,
        dependent_id: &str,
        independent_id: &str,
        window: usize,
    ) -> Result<DerivedMetricTable, AppError> {
        check_window(window)?;
        let n = self.table.len();
        if window > n {
            return Err(AppError::invalid(format!(
                "regression window {window} exceeds the {n} available rows"
            )));
        }

        let y = forward_fill(self.table.require_column(dependent_id)?);
        let x = forward_fill(self.table.require_column(independent_id)?);

        let fits: Vec<Option<(f64, f64)>> = (0..=n - window)
            .map(|start| {
                let (xs, ys): (Vec<f64>, Vec<f64>) = (start..start + window)
                    .filter_map(|row| Some((x[row]?, y[row]?)))
                    .unzip();
                fit_line(&xs, &ys).map(|fit| (fit.slope, fit.intercept))
            })
            .collect();

        let (slope, intercept): (Vec<Option<f64>>, Vec<Option<f64>>) = fits
            .into_iter()
            .map(|fit| (fit.map(|f| f.0), fit.map(|f| f.1)))
            .unzip();

        Ok(DerivedMetricTable::new(
            self.table.dates()[window - 1..].to_vec(),
            vec![
                MetricColumn {
                    name: "slope",
                    values: slope,
                },
                MetricColumn {
                    name: "intercept",
                    values: intercept,
                },
            ],
        ))
    }

    /// Trailing Pearson correlation of two columns.
    ///
    /// The first `window - 1` rows are missing, as is any window with a gap or
    /// without variance on either side.
    pub fn rolling_correlation(
        &self,
        id_a: &str,
        id_b: &str,
        window: usize,
    ) -> Result<DerivedMetricTable, AppError> {
        check_window(window)?;
        let a = self.table.require_column(id_a)?;
        let b = self.table.require_column(id_b)?;

        let values = trailing(self.table.len(), window, |rows| {
            pearson(&complete(&a[rows.clone()])?, &complete(&b[rows])?)
        });

        Ok(DerivedMetricTable::new(
            self.table.dates().to_vec(),
            vec![MetricColumn {
                name: "correlation",
                values,
            }],
        ))
    }

    /// Trailing sample standard deviation of one column.
    pub fn rolling_volatility(
        &self,
        series_id: &str,
        window: usize,
    ) -> Result<DerivedMetricTable, AppError> {
        check_window(window)?;
        let values_in = self.table.require_column(series_id)?;

        let values = trailing(self.table.len(), window, |rows| {
            sample_std(&complete(&values_in[rows])?)
        });

        Ok(DerivedMetricTable::new(
            self.table.dates().to_vec(),
            vec![MetricColumn {
                name: "volatility",
                values,
            }],
        ))
    }

    /// `ratio = (far - near) / near`.
    ///
    /// A near value of exactly zero is rejected rather than producing an
    /// infinite ratio.
    pub fn contango_ratio(
        &self,
        near_id: &str,
        far_id: &str,
    ) -> Result<DerivedMetricTable, AppError> {
        let near = self.table.require_column(near_id)?;
        let far = self.table.require_column(far_id)?;

        let mut ratio = Vec::with_capacity(near.len());
        for ((date, n), f) in self.table.dates().iter().zip(near).zip(far) {
            let value = match (n, f) {
                (Some(n), _) if *n == 0.0 => {
                    return Err(AppError::invalid(format!(
                        "{near_id} is zero on {date}; contango ratio is undefined"
                    )));
                }
                (Some(n), Some(f)) => Some((f - n) / n),
                _ => None,
            };
            ratio.push(value);
        }

        Ok(DerivedMetricTable::new(
            self.table.dates().to_vec(),
            vec![MetricColumn {
                name: "ratio",
                values: ratio,
            }],
        ))
    }
}

fn check_window(window: usize) -> Result<(), AppError> {
    if window < 2 {
        return Err(AppError::invalid(format!(
            "window must be at least 2 rows, got {window}"
        )));
    }
    Ok(())
}

/// Evaluate `stat` on each trailing window; rows without a full window are `None`.
fn trailing<F>(len: usize, window: usize, stat: F) -> Vec<Option<f64>>
where
    F: Fn(std::ops::Range<usize>) -> Option<f64>,
{
    (0..len)
        .map(|end| {
            if end + 1 < window {
                None
            } else {
                stat(end + 1 - window..end + 1)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::{Column, SeriesId};

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn table(cols: &[(&str, Vec<Option<f64>>)]) -> TimeSeriesTable {
        let n = cols.first().map(|(_, v)| v.len()).unwrap_or(0);
        let dates = (1..=n as u32).map(d).collect();
        let columns = cols
            .iter()
            .map(|(id, values)| Column {
                id: SeriesId::from(*id),
                values: values.clone(),
            })
            .collect();
        TimeSeriesTable::from_columns(dates, columns).unwrap()
    }

    fn some(values: &[f64]) -> Vec<Option<f64>> {
        values.iter().copied().map(Some).collect()
    }

    fn close(a: Option<f64>, b: f64) -> bool {
        a.is_some_and(|a| (a - b).abs() < 1e-9)
    }

    #[test]
    fn inversion_flags_only_negative_spreads() {
        let t = table(&[
            ("DGS3MO", vec![Some(5.0), Some(4.0), Some(4.0), None]),
            ("DGS10", vec![Some(4.5), Some(4.0), Some(4.25), Some(4.0)]),
        ]);
        let out = YieldCurveAnalytics::new(&t)
            .yield_curve_inversion("DGS3MO", "DGS10")
            .unwrap();
        assert_eq!(out.len(), 4);
        assert_eq!(out.dates(), t.dates());
        assert_eq!(out.column("spread").unwrap(), &[Some(-0.5), Some(0.0), Some(0.25), None]);
        assert_eq!(
            out.column("inversion_flag").unwrap(),
            &[Some(1.0), Some(0.0), Some(0.0), Some(0.0)]
        );
    }

    #[test]
    fn missing_spread_is_not_an_inversion() {
        let t = table(&[
            ("short", vec![Some(5.0), None]),
            ("long", vec![Some(4.0), Some(4.0)]),
        ]);
        let out = YieldCurveAnalytics::new(&t)
            .yield_curve_inversion("short", "long")
            .unwrap();
        assert_eq!(out.column("spread").unwrap(), &[Some(-1.0), None]);
        assert_eq!(out.column("inversion_flag").unwrap(), &[Some(1.0), Some(0.0)]);
    }

    #[test]
    fn regression_output_is_dated_by_window_end() {
        let t = table(&[
            ("y", some(&[0.0, 2.0, 4.0, 6.0, 8.0])),
            ("x", some(&[0.0, 1.0, 2.0, 3.0, 4.0])),
        ]);
        let out = YieldCurveAnalytics::new(&t).rolling_regression("y", "x", 3).unwrap();
        assert_eq!(out.len(), 5 - 3 + 1);
        assert_eq!(out.dates(), &[d(3), d(4), d(5)]);
        for row in 0..out.len() {
            assert!(close(out.column("slope").unwrap()[row], 2.0));
            assert!(close(out.column("intercept").unwrap()[row], 0.0));
        }
    }

    #[test]
    fn regression_matches_independent_fits_in_row_order() {
        let y = [1.0, 4.0, 2.0, 8.0, 5.0, 7.0, 3.0, 9.0];
        let x = [0.5, 1.0, 3.0, 2.0, 6.0, 4.0, 7.0, 5.0];
        let t = table(&[("y", some(&y)), ("x", some(&x))]);
        let out = YieldCurveAnalytics::new(&t).rolling_regression("y", "x", 3).unwrap();
        assert_eq!(out.len(), 6);
        for start in 0..out.len() {
            let fit = fit_line(&x[start..start + 3], &y[start..start + 3]).unwrap();
            assert!(close(out.column("slope").unwrap()[start], fit.slope));
            assert!(close(out.column("intercept").unwrap()[start], fit.intercept));
        }
    }

    #[test]
    fn regression_window_of_two_points() {
        let t = table(&[("y", some(&[0.0, 2.0])), ("x", some(&[0.0, 1.0]))]);
        let out = YieldCurveAnalytics::new(&t).rolling_regression("y", "x", 2).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out.dates(), &[d(2)]);
        assert!(close(out.column("slope").unwrap()[0], 2.0));
        assert!(close(out.column("intercept").unwrap()[0], 0.0));
    }

    #[test]
    fn regression_forward_fills_then_drops_leading_gaps() {
        // x gap at row 2 is filled with 1.0; row 0 has no prior value and is dropped.
        let t = table(&[
            ("y", vec![Some(9.0), Some(3.0), Some(3.0), Some(7.0)]),
            ("x", vec![None, Some(1.0), None, Some(3.0)]),
        ]);
        let out = YieldCurveAnalytics::new(&t).rolling_regression("y", "x", 2).unwrap();
        assert_eq!(out.len(), 3);
        // Window [0,2): one complete row only.
        assert_eq!(out.column("slope").unwrap()[0], None);
        // Window [1,3): x = [1,1] has no spread.
        assert_eq!(out.column("slope").unwrap()[1], None);
        // Window [2,4): (1,3) and (3,7) -> slope 2, intercept 1.
        assert!(close(out.column("slope").unwrap()[2], 2.0));
        assert!(close(out.column("intercept").unwrap()[2], 1.0));
    }

    #[test]
    fn regression_rejects_degenerate_windows() {
        let t = table(&[("y", some(&[1.0, 2.0, 3.0])), ("x", some(&[1.0, 2.0, 3.0]))]);
        let a = YieldCurveAnalytics::new(&t);
        assert!(a.rolling_regression("y", "x", 1).unwrap_err().is_invalid_argument());
        assert!(a.rolling_regression("y", "x", 4).unwrap_err().is_invalid_argument());
        assert!(a.rolling_regression("y", "nope", 2).unwrap_err().is_invalid_argument());
    }

    #[test]
    fn correlation_with_itself_is_one_after_warmup() {
        let t = table(&[("a", some(&[1.0, 4.0, 2.0, 8.0, 5.0, 7.0]))]);
        let out = YieldCurveAnalytics::new(&t).rolling_correlation("a", "a", 3).unwrap();
        let corr = out.column("correlation").unwrap();
        assert_eq!(corr.len(), 6);
        assert_eq!(&corr[..2], &[None::<f64>, None]);
        for value in &corr[2..] {
            assert!(close(*value, 1.0));
        }
    }

    #[test]
    fn correlation_gap_poisons_its_windows() {
        let t = table(&[
            ("a", vec![Some(1.0), Some(2.0), None, Some(4.0), Some(5.0)]),
            ("b", some(&[2.0, 4.0, 6.0, 8.0, 11.0])),
        ]);
        let out = YieldCurveAnalytics::new(&t).rolling_correlation("a", "b", 2).unwrap();
        let corr = out.column("correlation").unwrap();
        assert_eq!(corr[0], None);
        assert!(close(corr[1], 1.0));
        assert_eq!(corr[2], None);
        assert_eq!(corr[3], None);
        assert!(close(corr[4], 1.0));
    }

    #[test]
    fn volatility_is_trailing_sample_std() {
        let t = table(&[("v", some(&[1.0, 2.0, 3.0, 5.0]))]);
        let out = YieldCurveAnalytics::new(&t).rolling_volatility("v", 3).unwrap();
        let vol = out.column("volatility").unwrap();
        assert_eq!(&vol[..2], &[None::<f64>, None]);
        assert!(close(vol[2], 1.0));
        // [2,3,5]: mean 10/3, sample variance 7/3.
        assert!(close(vol[3], (7.0f64 / 3.0).sqrt()));
    }

    #[test]
    fn oversized_rolling_window_is_all_missing() {
        let t = table(&[("v", some(&[1.0, 2.0]))]);
        let out = YieldCurveAnalytics::new(&t).rolling_volatility("v", 5).unwrap();
        assert_eq!(out.column("volatility").unwrap(), &[None::<f64>, None]);
        assert!(
            YieldCurveAnalytics::new(&t)
                .rolling_volatility("v", 1)
                .unwrap_err()
                .is_invalid_argument()
        );
    }

    #[test]
    fn contango_ratio_relative_to_near() {
        let t = table(&[
            ("near", vec![Some(2.0), Some(4.0), None]),
            ("far", vec![Some(3.0), Some(3.0), Some(1.0)]),
        ]);
        let out = YieldCurveAnalytics::new(&t).contango_ratio("near", "far").unwrap();
        assert_eq!(out.column("ratio").unwrap(), &[Some(0.5), Some(-0.25), None]);
    }

    #[test]
    fn contango_ratio_rejects_zero_near() {
        let t = table(&[("near", some(&[1.0, 0.0])), ("far", some(&[2.0, 2.0]))]);
        let err = YieldCurveAnalytics::new(&t)
            .contango_ratio("near", "far")
            .unwrap_err();
        assert!(err.is_invalid_argument());
        assert!(err.to_string().contains("2024-01-02"));
    }
}
