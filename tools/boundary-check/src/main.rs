use cargo_metadata::{DependencyKind, MetadataCommand, Package};
use std::collections::{BTreeMap, BTreeSet};

const SELF_NAME: &str = "boundary-check";

fn main() {
    let metadata = match MetadataCommand::new().no_deps().exec() {
        Ok(metadata) => metadata,
        Err(err) => {
            eprintln!("{SELF_NAME}: failed to read cargo metadata: {err}");
            std::process::exit(2);
        }
    };

    let workspace: BTreeSet<_> = metadata.workspace_members.iter().cloned().collect();
    let packages: BTreeMap<String, Package> = metadata
        .packages
        .into_iter()
        .filter(|pkg| workspace.contains(&pkg.id))
        .map(|pkg| (pkg.name.clone(), pkg))
        .collect();

    let violations = check(&packages, &allowlist());
    if violations.is_empty() {
        println!("{SELF_NAME}: ok");
    } else {
        eprintln!("{SELF_NAME}: forbidden workspace dependencies detected:");
        for item in violations {
            eprintln!("  {item}");
        }
        std::process::exit(1);
    }
}

fn check(
    packages: &BTreeMap<String, Package>,
    allowlist: &BTreeMap<&'static str, BTreeSet<&'static str>>,
) -> Vec<String> {
    let mut violations = Vec::new();
    for (name, pkg) in packages {
        if name == SELF_NAME {
            continue;
        }
        let Some(allowed) = allowlist.get(name.as_str()) else {
            violations.push(format!("{name} is not listed in the boundary allowlist"));
            continue;
        };
        for dep in runtime_workspace_deps(pkg, packages) {
            if !allowed.contains(dep.as_str()) {
                violations.push(format!("{name} -> {dep}"));
            }
        }
    }
    violations
}

/// Dev-dependencies may cross layers; only build and normal edges count.
fn runtime_workspace_deps(pkg: &Package, workspace: &BTreeMap<String, Package>) -> Vec<String> {
    pkg.dependencies
        .iter()
        .filter(|dep| dep.kind != DependencyKind::Development)
        .filter(|dep| dep.name != pkg.name && workspace.contains_key(&dep.name))
        .map(|dep| dep.name.clone())
        .collect()
}

fn allowlist() -> BTreeMap<&'static str, BTreeSet<&'static str>> {
    let mut map = BTreeMap::new();
    map.insert("inframind-core", BTreeSet::new());
    map.insert("inframind-analysis", set(["inframind-core"]));
    map.insert(
        "inframind-report",
        set(["inframind-core", "inframind-analysis"]),
    );
    map.insert(
        "inframind-cli",
        set(["inframind-core", "inframind-analysis", "inframind-report"]),
    );
    map
}

fn set<const N: usize>(items: [&'static str; N]) -> BTreeSet<&'static str> {
    items.into_iter().collect()
}
