//! Shell programs standing in for the executables under test
//!
//! The "drawer" scripts render a CSV by replacing digits with `*`, which is
//! deterministic and cheap. A file containing the word `bad` is rejected the
//! way a malformed CSV would be.

/// Reference program: never checks the extension
pub const REFERENCE: &str = r#"
if grep -q bad "$1"; then
    printf 'Invalid input\n' >&2
    exit 1
fi
sed 's/[0-9]/*/g' "$1"
"#;

/// Candidate that matches the reference and also rejects unsupported extensions
pub const CANDIDATE: &str = r#"
case "$1" in
    *.csv) ;;
    *) printf 'Invalid input\n' >&2; exit 1 ;;
esac
if grep -q bad "$1"; then
    printf 'Invalid input\n' >&2
    exit 1
fi
sed 's/[0-9]/*/g' "$1"
"#;

/// Candidate that behaves like the reference everywhere, extension included
pub const CANDIDATE_NO_EXTENSION_CHECK: &str = REFERENCE;

/// Candidate that prints one extra blank line after the rendering
pub const CANDIDATE_TRAILING_NEWLINE: &str = r#"
if grep -q bad "$1"; then
    printf 'Invalid input\n' >&2
    exit 1
fi
sed 's/[0-9]/*/g' "$1"
echo
"#;

/// Candidate that rejects malformed input with the wrong exit code
pub const CANDIDATE_WRONG_EXIT: &str = r#"
case "$1" in
    *.csv) ;;
    *) printf 'Invalid input\n' >&2; exit 1 ;;
esac
if grep -q bad "$1"; then
    printf 'Invalid input\n' >&2
    exit 2
fi
sed 's/[0-9]/*/g' "$1"
"#;

/// Candidate that reports errors with a different message
pub const CANDIDATE_WRONG_MESSAGE: &str = r#"
if grep -q bad "$1"; then
    printf 'invalid input\n' >&2
    exit 1
fi
case "$1" in
    *.csv) ;;
    *) printf 'Invalid input\n' >&2; exit 1 ;;
esac
sed 's/[0-9]/*/g' "$1"
"#;

/// Checker body shared by the clean and leaky variants; `$SUMMARY` is set first
const CHECKER_BODY: &str = r#"
log=""
while [ $# -gt 0 ]; do
    case "$1" in
        --log-file=*) log="${1#--log-file=}"; shift ;;
        --*) shift ;;
        *) break ;;
    esac
done
printf '==4242== Memcheck, a memory error detector\n==4242== %s\n' "$SUMMARY" > "$log"
exec "$@"
"#;

/// Memory checker that writes a clean valgrind-style report
pub fn checker_clean() -> String {
    format!(
        "SUMMARY='ERROR SUMMARY: 0 errors from 0 contexts (suppressed: 0 from 0)'\n{CHECKER_BODY}"
    )
}

/// Memory checker that writes a report with one leak
pub fn checker_leaky() -> String {
    format!(
        "SUMMARY='ERROR SUMMARY: 1 errors from 1 contexts (suppressed: 0 from 0)'\n{CHECKER_BODY}"
    )
}
