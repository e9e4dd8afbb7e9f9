use time::format_description;
use time::OffsetDateTime;

/// Build instant, honouring `SOURCE_DATE_EPOCH` for reproducible builds.
fn build_instant() -> OffsetDateTime {
    std::env::var("SOURCE_DATE_EPOCH")
        .ok()
        .and_then(|secs| secs.parse::<i64>().ok())
        .and_then(|secs| OffsetDateTime::from_unix_timestamp(secs).ok())
        .unwrap_or_else(OffsetDateTime::now_utc)
}

/// Export `var` to the crate, either as given in the environment or as
/// `instant` rendered with `pattern`.
fn stamp(var: &str, instant: OffsetDateTime, pattern: &str) {
    println!("cargo:rerun-if-env-changed={var}");
    let value = std::env::var(var).unwrap_or_else(|_| {
        format_description::parse(pattern)
            .ok()
            .and_then(|items| instant.format(&items).ok())
            .unwrap_or_else(|| "unknown".to_string())
    });
    println!("cargo:rustc-env={var}={value}");
}

fn main() {
    println!("cargo:rerun-if-changed=src");
    println!("cargo:rerun-if-env-changed=SOURCE_DATE_EPOCH");

    let instant = build_instant();
    stamp("NION_BUILD_DATE", instant, "[year]-[month]-[day]");
    stamp("NION_BUILD_TIME", instant, "[hour]:[minute]:[second]");
}
