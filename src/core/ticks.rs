use smallvec::SmallVec;

pub type Ticks = SmallVec<[f64; 16]>;

/// Evenly spaced "nice" tick values covering `[start, stop]`.
///
/// The step is a 1, 2 or 5 multiple of a power of ten chosen so that roughly
/// `count` ticks fit. A zero count yields no ticks.
#[must_use]
pub fn nice_ticks(start: f64, stop: f64, count: usize) -> Ticks {
    let mut ticks = Ticks::new();
    if count == 0 || !start.is_finite() || !stop.is_finite() || stop < start {
        return ticks;
    }
    if start == stop {
        ticks.push(start);
        return ticks;
    }

    let step = tick_step(start, stop, count);
    if !(step.is_finite() && step > 0.0) {
        return ticks;
    }
    let first = (start / step).ceil() as i64;
    let last = (stop / step).floor() as i64;
    // Dividing by the inverse keeps fractional steps free of binary drift.
    let inverse = (1.0 / step).round();
    for index in first..=last {
        if step < 1.0 {
            ticks.push(index as f64 / inverse);
        } else {
            ticks.push(index as f64 * step);
        }
    }
    ticks
}

fn tick_step(start: f64, stop: f64, count: usize) -> f64 {
    let raw = (stop - start) / count as f64;
    let power = raw.log10().floor();
    let base = 10f64.powf(power);
    let error = raw / base;
    let factor = if error >= 50f64.sqrt() {
        10.0
    } else if error >= 10f64.sqrt() {
        5.0
    } else if error >= 2f64.sqrt() {
        2.0
    } else {
        1.0
    };
    factor * base
}

#[cfg(test)]
mod tests {
    use super::nice_ticks;

    #[test]
    fn picks_round_steps() {
        let ticks = nice_ticks(0.0, 45.0, 4);
        assert_eq!(ticks.as_slice(), &[0.0, 10.0, 20.0, 30.0, 40.0]);
    }

    #[test]
    fn zero_count_is_empty() {
        assert!(nice_ticks(0.0, 5.0, 0).is_empty());
    }
}
