//! End-to-end resolution over in-memory and on-disk projects.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use arbiter::host::AutoloadChain;
use arbiter::project::{ManifestReader, ProjectCatalog};
use arbiter::{
    ClassResolver, ComposerDirSource, DiscoveredProject, InstalledState, MemorySource,
    ProjectRoot,
};
use rstest::rstest;

fn project(root: &str, versions: &[(&str, &str)]) -> DiscoveredProject {
    let installed = versions
        .iter()
        .fold(InstalledState::new(root), |state, (p, v)| state.with_version(p, v));
    DiscoveredProject::new(root).with_installed(installed)
}

/// Lay out `<dir>/vendor/composer/{installed.json,autoload_classmap.php}`.
fn write_vendor(dir: &Path, packages: &[(&str, &str)], classes: &[(&str, &str)]) {
    let composer = dir.join("vendor").join("composer");
    fs::create_dir_all(&composer).unwrap();

    let packages: Vec<_> = packages
        .iter()
        .map(|(name, version)| serde_json::json!({ "name": name, "version": version }))
        .collect();
    fs::write(
        composer.join("installed.json"),
        serde_json::json!({ "packages": packages }).to_string(),
    )
    .unwrap();

    let mut php = String::from("<?php\n\n$vendorDir = dirname(__DIR__);\n$baseDir = dirname($vendorDir);\n\nreturn array(\n");
    for (class, rel) in classes {
        php.push_str(&format!(
            "    '{}' => $vendorDir . '{}',\n",
            class.replace('\\', "\\\\"),
            rel
        ));
    }
    php.push_str(");\n");
    fs::write(composer.join("autoload_classmap.php"), php).unwrap();
}

#[test]
fn test_two_project_example() {
    let source = MemorySource::new();
    source.add_loader(project("/no/such/A", &[("pkgX", "1.0.0")]).with_class("Foo", "A/Foo"));
    source.add_loader(
        project("/no/such/B", &[("pkgX", "2.0.0")])
            .with_class("Foo", "B/Foo")
            .with_class("Bar", "B/Bar"),
    );

    let resolver = ClassResolver::new(source);
    let merged = resolver.run().unwrap();

    let ranked: Vec<_> = merged
        .precedence()
        .iter()
        .map(|(root, score)| (root.to_string(), score))
        .collect();
    assert_eq!(
        ranked,
        vec![
            ("/no/such/B/".to_string(), 1),
            ("/no/such/A/".to_string(), -1_000_000_000),
        ]
    );

    let entries: Vec<_> = merged.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
    assert_eq!(
        entries,
        vec![
            ("Foo".to_string(), "B/Foo".to_string()),
            ("Bar".to_string(), "B/Bar".to_string()),
        ]
    );
}

#[test]
fn test_single_project_uncontested() {
    let source = MemorySource::new();
    source.add_loader(project("/no/such/solo", &[("acme/a", "0.1.0"), ("acme/b", "12.0.0")]));

    let merged = ClassResolver::new(source).run().unwrap();
    let scores: Vec<_> = merged.precedence().iter().map(|(_, s)| s).collect();
    assert_eq!(scores, vec![2]);
}

#[test]
fn test_uncontested_credit_can_outrank_small_gap() {
    // B is one build behind on pkgX (-1) but declares four uncontested
    // packages (+4); A is current on pkgX (+1) and nothing else.
    let source = MemorySource::new();
    source.add_loader(project("/no/such/a", &[("pkgX", "1.0.0.1")]).with_class("Foo", "A/Foo"));
    source.add_loader(
        project(
            "/no/such/b",
            &[("pkgX", "1.0.0.0"), ("p1", "1"), ("p2", "1"), ("p3", "1"), ("p4", "1")],
        )
        .with_class("Foo", "B/Foo"),
    );

    let merged = ClassResolver::new(source).run().unwrap();
    assert_eq!(merged.get("Foo"), Some("B/Foo"));
}

#[test]
fn test_determinism_across_runs() {
    let build = || {
        let source = MemorySource::new();
        for (i, name) in ["c", "a", "b", "d"].iter().enumerate() {
            let root = format!("/no/such/{name}");
            let version = format!("1.{}.0", i % 2);
            let mut discovered = project(&root, &[("acme/shared", version.as_str())]);
            for class in ["Zeta", "Alpha", "Mid"] {
                discovered = discovered.with_class(class, &format!("{root}/{class}.php"));
            }
            source.add_loader(discovered.with_class(&format!("Only{name}"), "x.php"));
        }
        let merged = ClassResolver::new(source).run().unwrap();
        merged
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("\n")
    };

    assert_eq!(build(), build());
}

#[test]
fn test_global_listing_influences_scores() {
    // An unregistered project at pkgX 3.0.0 makes both registered copies stale;
    // B is closer, so it wins.
    let source = MemorySource::new();
    source.add_loader(project("/no/such/a", &[("pkgX", "1.0.0")]).with_class("Foo", "A/Foo"));
    source.add_loader(project("/no/such/b", &[("pkgX", "2.0.0")]).with_class("Foo", "B/Foo"));
    source.add_installed(InstalledState::new("/no/such/c").with_version("pkgX", "3.0.0"));

    let resolver = ClassResolver::new(source);
    let merged = resolver.run().unwrap();
    assert_eq!(merged.get("Foo"), Some("B/Foo"));
    assert_eq!(merged.precedence().len(), 3);
    assert_eq!(
        merged.precedence().roots().next(),
        Some(&ProjectRoot::normalize("/no/such/c"))
    );
}

#[rstest]
#[case::no_manifest(None)]
#[case::empty_manifest(Some(r#"{}"#))]
#[case::nameless_manifest(Some(r#"{"version": "4.0.0"}"#))]
#[case::named_manifest(Some(r#"{"name": "acme/plugin", "version": "4.0.0"}"#))]
fn test_sentinel_never_leaks(#[case] manifest: Option<&str>) {
    let dir = tempfile::tempdir().unwrap();
    if let Some(contents) = manifest {
        fs::write(dir.path().join("composer.json"), contents).unwrap();
    }
    let installed = InstalledState::new(dir.path())
        .with_version("__root__", "1.0.0")
        .with_version("acme/log", "1.0.0");

    let catalog = ProjectCatalog::build(
        vec![DiscoveredProject::new(dir.path()).with_installed(installed.clone())],
        vec![installed],
        &ManifestReader::default(),
        "__root__",
    )
    .unwrap();

    for record in catalog.records() {
        assert!(!record.versions().contains_key("__root__"));
    }
}

#[test]
fn test_vendor_dirs_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let old = dir.path().join("plugin-old");
    let new = dir.path().join("plugin-new");

    write_vendor(
        &old,
        &[("psr/log", "1.1.4"), ("acme/http", "2.0.0")],
        &[("Psr\\Log\\LoggerInterface", "/psr/log/src/LoggerInterface.php")],
    );
    fs::write(old.join("composer.json"), r#"{"name": "acme/old-plugin", "version": "1.0.0"}"#)
        .unwrap();

    write_vendor(
        &new,
        &[("psr/log", "3.0.0"), ("acme/http", "2.0.0")],
        &[
            ("Psr\\Log\\LoggerInterface", "/psr/log/src/LoggerInterface.php"),
            ("Psr\\Log\\LogLevel", "/psr/log/src/LogLevel.php"),
        ],
    );

    let source = ComposerDirSource::new(vec![old.join("vendor"), new.join("vendor")]);
    let resolver = ClassResolver::new(source);
    resolver.run().unwrap();

    let new_vendor = ProjectRoot::normalize(new.join("vendor"));
    let winner = resolver.lookup("Psr\\Log\\LoggerInterface").unwrap();
    assert!(winner.starts_with(new_vendor.as_str()), "{winner}");

    let losers = resolver.shadowed("Psr\\Log\\LoggerInterface");
    assert_eq!(losers.len(), 1);
    assert_eq!(losers[0].root, ProjectRoot::normalize(&old));
}

#[test]
fn test_failed_run_keeps_previous_map() {
    let dir = tempfile::tempdir().unwrap();
    let source = MemorySource::new();
    source.add_loader(
        DiscoveredProject::new(dir.path()).with_class("Foo", "/first/Foo.php"),
    );

    let resolver = Arc::new(ClassResolver::new(source));
    let chain = Arc::new(AutoloadChain::new());
    let mut hook = Arc::clone(&resolver).install(Arc::clone(&chain));
    hook.refresh().unwrap();
    assert_eq!(chain.locate("Foo").as_deref(), Some("/first/Foo.php"));

    fs::write(dir.path().join("composer.json"), "{ broken").unwrap();
    assert!(hook.refresh().is_err());

    assert!(hook.is_registered());
    assert_eq!(chain.locate("Foo").as_deref(), Some("/first/Foo.php"));
    assert_eq!(resolver.lookup("Foo").as_deref(), Some("/first/Foo.php"));
}

#[test]
fn test_concurrent_lookups_during_runs() {
    let source = MemorySource::new();
    source.add_loader(project("/no/such/a", &[("pkgX", "1.0.0")]).with_class("Foo", "A/Foo"));
    source.add_loader(project("/no/such/b", &[("pkgX", "2.0.0")]).with_class("Foo", "B/Foo"));
    let resolver = Arc::new(ClassResolver::new(source));
    resolver.run().unwrap();

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let resolver = Arc::clone(&resolver);
            std::thread::spawn(move || {
                for _ in 0..50 {
                    if i % 2 == 0 {
                        resolver.run().unwrap();
                    } else {
                        assert_eq!(resolver.lookup("Foo").as_deref(), Some("B/Foo"));
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn test_normalized_versions_rank_release_candidates() {
    let dir = tempfile::tempdir().unwrap();
    let mut vendors = Vec::new();
    for (name, display, normalized) in [
        ("plugin-rc", "1.2.3-RC1", "1.2.3.0-RC1"),
        ("plugin-stable", "v1.2.1", "1.2.1.0"),
    ] {
        let vendor = dir.path().join(name).join("vendor");
        let composer = vendor.join("composer");
        fs::create_dir_all(&composer).unwrap();
        fs::write(
            composer.join("installed.json"),
            serde_json::json!({ "packages": [{
                "name": "psr/log",
                "version": display,
                "version_normalized": normalized,
            }] })
            .to_string(),
        )
        .unwrap();
        fs::write(
            composer.join("autoload_classmap.php"),
            "<?php\nreturn array(\n    'Psr\\\\Log\\\\Log' => $vendorDir . '/psr/log/Log.php',\n);\n",
        )
        .unwrap();
        vendors.push(vendor);
    }

    let resolver = ClassResolver::new(ComposerDirSource::new(vendors));
    resolver.run().unwrap();

    let winner = resolver.lookup_entry("Psr\\Log\\Log").unwrap();
    assert_eq!(winner.root, ProjectRoot::normalize(dir.path().join("plugin-rc")));
}
