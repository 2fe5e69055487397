use std::time::Instant;

///
/// measure time in milli-seconds (ms) of closure.
///
pub fn timer<F, T>(f: F) -> (T, u128)
where
    F: FnOnce() -> T,
{
    let start = Instant::now();
    let ret = f();
    let duration = start.elapsed();
    (ret, duration.as_millis())
}

//
// tests
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timer_returns_value() {
        let (x, _ms) = timer(|| 1 + 2);
        assert_eq!(x, 3);
    }
}
