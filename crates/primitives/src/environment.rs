use std::env;

/// Deployment environment, selected via `COHORT_ENVIRONMENT`. Mirrors the
/// distinction the logging layer needs between a developer's machine
/// (pretty, file/line-annotated logs) and anything else (flattened JSON).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Local,
    Other,
}

pub fn get_cohort_environment() -> Environment {
    match env::var("COHORT_ENVIRONMENT") {
        Ok(val) if val.eq_ignore_ascii_case("local") => Environment::Local,
        Ok(_) => Environment::Other,
        Err(_) => Environment::Local,
    }
}

/// Whether logs should be rendered human-first (`true`) or as flattened
/// JSON (`false`). Controlled independently of `Environment` so tests and
/// local tooling can force either format via `COHORT_PRETTY_PRINT_LOGS`.
pub fn get_pretty_print_logs() -> bool {
    match env::var("COHORT_PRETTY_PRINT_LOGS") {
        Ok(val) => val.eq_ignore_ascii_case("true") || val == "1",
        Err(_) => matches!(get_cohort_environment(), Environment::Local),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    static ENV_GUARD: Mutex<()> = Mutex::new(());

    #[test]
    fn defaults_to_local_when_unset() {
        let _guard = ENV_GUARD.lock().unwrap();
        env::remove_var("COHORT_ENVIRONMENT");
        assert_eq!(get_cohort_environment(), Environment::Local);
    }

    #[test]
    fn respects_explicit_environment() {
        let _guard = ENV_GUARD.lock().unwrap();
        env::set_var("COHORT_ENVIRONMENT", "production");
        assert_eq!(get_cohort_environment(), Environment::Other);
        env::remove_var("COHORT_ENVIRONMENT");
    }
}
