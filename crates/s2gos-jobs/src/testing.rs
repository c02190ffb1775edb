//! Demo processes and a ready-made service exposing them.
//!
//! Used by the CLI and by integration tests.

use std::time::{Duration, Instant};

use s2gos_core::JobContext;
use s2gos_macros::process;
use s2gos_protocols::{ProcessError, ServiceError};

use crate::config::PoolConfig;
use crate::service::LocalService;

pub const DEMO_TITLE: &str = "S2GOS API Server (local dummy for testing)";
pub const DEMO_DESCRIPTION: &str =
    "Local test server implementing the OGC API - Processes 1.0 Standard";

/// Largest span of numbers the demo sieve will allocate for.
const MAX_SIEVE_LEN: u64 = 1 << 27;

/// Sleeps for `duration` seconds.
/// Fails on purpose if `fail` is true.
/// Returns the effective amount of sleep in seconds.
#[process(id = "sleep_a_while", title = "Sleep Processor")]
pub fn sleep_a_while(
    ctx: &JobContext,
    #[default(10.0)] duration: f64,
    #[default(false)] fail: bool,
) -> Result<f64, ProcessError> {
    let invalid_duration = || ProcessError::InvalidArgument {
        name: "duration".to_string(),
        message: "must be a finite, non-negative number of seconds".to_string(),
    };
    if !duration.is_finite() || duration < 0.0 {
        return Err(invalid_duration());
    }
    let step = Duration::try_from_secs_f64(duration / 100.0).map_err(|_| invalid_duration())?;
    let started = Instant::now();
    for i in 0..=100 {
        ctx.report_progress(Some(i), None)?;
        if fail && i == 50 {
            return Err(ProcessError::failed("Woke up too early"));
        }
        std::thread::sleep(step);
    }
    Ok(started.elapsed().as_secs_f64())
}

/// Returns the list of prime numbers between `min_val` and `max_val`.
#[process(id = "primes_between", title = "Prime Processor")]
pub fn primes_between(
    ctx: &JobContext,
    min_val: i64,
    max_val: i64,
) -> Result<Vec<i64>, ProcessError> {
    if max_val < 2 || max_val <= min_val {
        return Err(ProcessError::failed(
            "max_val must be greater 1 and greater min_val",
        ));
    }
    let low = min_val.max(2);
    // low <= max_val here, so the difference cannot overflow
    let span = (max_val - low) as u64 + 1;
    if span > MAX_SIEVE_LEN {
        return Err(sieve_too_large());
    }

    ctx.report_progress(None, Some("Step 1: Generate sieve up to sqrt(max_val)"))?;
    let small_primes = primes_up_to(max_val.isqrt() + 1)?;

    ctx.report_progress(
        None,
        Some("Step 2: Create the sieve for the range [min_val, max_val]"),
    )?;
    let mut is_prime = sieve_buffer(span)?;
    for p in small_primes {
        let Some(square) = p.checked_mul(p) else {
            continue;
        };
        let mut first = low.div_euclid(p) * p;
        if first < low {
            match first.checked_add(p) {
                Some(next) => first = next,
                None => continue,
            }
        }
        let mut multiple = first.max(square);
        while multiple <= max_val {
            is_prime[(multiple - low) as usize] = false;
            match multiple.checked_add(p) {
                Some(next) => multiple = next,
                None => break,
            }
        }
    }

    ctx.report_progress(None, Some("Done"))?;
    Ok(is_prime
        .iter()
        .enumerate()
        .filter(|(_, prime)| **prime)
        .map(|(i, _)| low + i as i64)
        .collect())
}

/// Plain sieve of Eratosthenes.
fn primes_up_to(limit: i64) -> Result<Vec<i64>, ProcessError> {
    let limit = limit.max(1) as u64;
    let mut is_prime = sieve_buffer(limit + 1)?;
    let limit = limit as usize;
    is_prime[0] = false;
    is_prime[1] = false;
    let mut i = 2;
    while i * i <= limit {
        if is_prime[i] {
            for j in (i * i..=limit).step_by(i) {
                is_prime[j] = false;
            }
        }
        i += 1;
    }
    Ok((2..=limit).filter(|&n| is_prime[n]).map(|n| n as i64).collect())
}

fn sieve_too_large() -> ProcessError {
    ProcessError::failed(format!(
        "Range too large: at most {MAX_SIEVE_LEN} numbers can be sieved"
    ))
}

/// A sieve of `len` flags, all set.
fn sieve_buffer(len: u64) -> Result<Vec<bool>, ProcessError> {
    if len > MAX_SIEVE_LEN {
        return Err(sieve_too_large());
    }
    let len = len as usize;
    let mut buffer = Vec::new();
    buffer.try_reserve_exact(len).map_err(ProcessError::failed)?;
    buffer.resize(len, true);
    Ok(buffer)
}

pub fn register_demo_processes(service: &LocalService) -> Result<(), ServiceError> {
    service.register(SleepAWhileProcess)?;
    service.register(PrimesBetweenProcess)?;
    Ok(())
}

/// Build a service with the demo processes registered.
pub fn demo_service(config: PoolConfig) -> Result<LocalService, ServiceError> {
    let service = LocalService::with_config(DEMO_TITLE, config).with_description(DEMO_DESCRIPTION);
    register_demo_processes(&service)?;
    Ok(service)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primes_up_to() {
        assert_eq!(primes_up_to(1).unwrap(), Vec::<i64>::new());
        assert_eq!(primes_up_to(2).unwrap(), vec![2]);
        assert_eq!(primes_up_to(20).unwrap(), vec![2, 3, 5, 7, 11, 13, 17, 19]);
    }

    #[test]
    fn test_sieve_buffer_bound() {
        assert_eq!(sieve_buffer(3).unwrap(), vec![true; 3]);
        assert!(sieve_buffer(MAX_SIEVE_LEN + 1).is_err());
    }

    #[test]
    fn test_primes_between() {
        let ctx = JobContext::detached("primes_between");
        assert_eq!(
            primes_between(&ctx, 10, 30).unwrap(),
            vec![11, 13, 17, 19, 23, 29]
        );
        assert_eq!(primes_between(&ctx, -5, 10).unwrap(), vec![2, 3, 5, 7]);
        assert_eq!(primes_between(&ctx, 0, 2).unwrap(), vec![2]);
        assert_eq!(primes_between(&ctx, 90, 96).unwrap(), Vec::<i64>::new());
    }

    #[test]
    fn test_primes_between_rejects_bad_range() {
        let ctx = JobContext::detached("primes_between");
        for (min_val, max_val) in [(0, 1), (10, 10), (20, 10)] {
            let err = primes_between(&ctx, min_val, max_val).unwrap_err();
            assert_eq!(
                err.to_string(),
                "max_val must be greater 1 and greater min_val"
            );
        }
    }

    #[test]
    fn test_primes_between_rejects_huge_range() {
        let ctx = JobContext::detached("primes_between");
        for (min_val, max_val) in [(0, i64::MAX / 2), (i64::MIN, i64::MAX), (0, i64::MAX)] {
            let err = primes_between(&ctx, min_val, max_val).unwrap_err();
            assert!(err.to_string().starts_with("Range too large"), "{err}");
        }
    }

    #[test]
    fn test_primes_between_near_upper_limit() {
        // narrow window, but the small-prime sieve would need sqrt(i64::MAX) flags
        let ctx = JobContext::detached("primes_between");
        let err = primes_between(&ctx, i64::MAX - 10, i64::MAX).unwrap_err();
        assert!(err.to_string().starts_with("Range too large"), "{err}");

        let top = (1_i64 << 40) + 200;
        let primes = primes_between(&ctx, top - 200, top).unwrap();
        assert!(!primes.is_empty());
        for p in primes {
            assert!(p > top - 200 && p <= top);
            assert!((2..=p.isqrt()).all(|d| p % d != 0), "{p} is not prime");
        }
    }

    #[test]
    fn test_sleep_a_while_rejects_bad_duration() {
        let ctx = JobContext::detached("sleep_a_while");
        for duration in [-1.0, f64::NAN, f64::INFINITY, f64::MAX] {
            let err = sleep_a_while(&ctx, duration, false).unwrap_err();
            assert!(
                matches!(err, ProcessError::InvalidArgument { ref name, .. } if name == "duration"),
                "{duration}: {err}"
            );
        }
    }

    #[test]
    fn test_sleep_a_while() {
        let ctx = JobContext::detached("sleep_a_while");
        let slept = sleep_a_while(&ctx, 0.05, false).unwrap();
        assert!(slept >= 0.04);

        let err = sleep_a_while(&ctx, 0.0, true).unwrap_err();
        assert_eq!(err.to_string(), "Woke up too early");
    }

    #[test]
    fn test_demo_service_registers_processes() {
        let service = demo_service(PoolConfig::default()).unwrap();
        let ids = service.registry().list();
        let ids: Vec<&str> = ids.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["sleep_a_while", "primes_between"]);
    }
}
