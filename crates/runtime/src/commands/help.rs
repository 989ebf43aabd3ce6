//! Help texts.

use crate::registry::Side;

pub(crate) fn short(prefix: &str) -> String {
    format!(
        "Try `{p}spires`, `{p}pattern <design ID>`, `{p}tweak 0c,0o,0w,0s`, `{p} 0c,0o,0w,0s`, \
         `{p}debug on|off` or `{p}reload`.\n\
         Type `{p}help full` for full help, `{p}help ids` for the spires and parts of this side.",
        p = prefix
    )
}

pub(crate) fn ids(side: &Side) -> String {
    let catalog = side.catalog();
    let spires: Vec<&str> = catalog.spires.keys().map(String::as_str).collect();
    let parts: Vec<&str> = catalog.parts.keys().map(String::as_str).collect();
    format!(
        "Valid spire IDs:\n```\n{}\n```\nParts and patterns available to `{}`:\n```\n{}\n```",
        spires.join(", "),
        side.name(),
        parts.join(", ")
    )
}

pub(crate) fn full(prefix: &str) -> String {
    format!(
        r#"**Set spires:** `{p}spires <comma separated spire IDs>`
Replace the list of spires used to scale COWS. Every ID must be valid or nothing changes.
`Tweak` is the spire adjusted by `{p}tweak`; `Home` stands for all home spires.
```
{p}spires + <comma separated spire IDs>
{p}spires - <comma separated spire IDs>
```
enable or disable individual spires; unknown IDs are reported and skipped.
With no arguments the current list is printed. Default list: `Home, Tweak`.

**Calculate design:** `{p}pattern <design ID>`
Calculate the COWS of a pattern defined in the data files. Counts and several patterns may be combined:
```
{p}pattern Test-A, Test-B:2
```
Patterns may be changed on the fly by adding or removing parts:
```
{p}pattern Test-A:2;+Part1;-Part2:3
```

**Tweak production:** `{p}tweak 0c,0o,0w,0s`
Set the production of the `Tweak` spire. It only counts while `Tweak` is enabled.

**Calculate from raw COWS:** `{p} 0c,0o,0w,0s`
Scale a raw COWS value by the current production.

COWS values may be partial, in any order, or empty; missing values are 0.

**Debug:** `{p}debug on|off`
Show the cost after every bonus in pattern results."#,
        p = prefix
    )
}
