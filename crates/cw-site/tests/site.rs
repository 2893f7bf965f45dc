use std::fs;
use std::path::Path;

use cw_compiler::{CompileOptions, Compiler};
use cw_site::{Repository, SiteBuilder, SiteError, SiteTemplates};

fn write(root: &Path, path: &str, content: &[u8]) {
    let path = root.join(path);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn repository(root: &Path) {
    write(root, "title.md", b"Digital Culture\n");
    write(root, "home.md", b"# Welcome\n\nStart with *module 1*.\n");
    write(root, "logo.png", &[0x89, b'P', b'N', b'G']);
    write(
        root,
        "module1/numbers.md",
        b"title: Numbers\n\n# Sums\n## Basics\n![chart](media/chart.png)\n\n{{Q: 2+2=? | *4 | 3}}\n",
    );
    write(root, "module1/media/chart.png", &[1, 2, 3]);
    write(
        root,
        "module2/video.md",
        b"# Watch\n## Clip\n[Clip](https://vimeo.com/42){: .cnvideo}\n",
    );
}

#[test]
fn test_build_site() {
    let repo_dir = tempfile::tempdir().unwrap();
    let out_dir = tempfile::tempdir().unwrap();
    repository(repo_dir.path());
    let destination = out_dir.path().join("site");

    let repo = Repository::load(repo_dir.path()).unwrap();
    let sources = repo.sources().modules;
    let options = CompileOptions::default()
        .with_ims(cw_archive::ImsExporter::new())
        .with_edx(cw_archive::EdxExporter::new());
    let course =
        Compiler::new(options).compile_course(&repo.title, repo.logo_identity(), &sources);
    assert!(course.failures.is_empty());

    let builder = SiteBuilder::new(SiteTemplates::new().unwrap());
    builder.build(&repo, &sources, &course, &destination).unwrap();

    let index = fs::read_to_string(destination.join("index.html")).unwrap();
    assert!(index.contains("<title>Digital Culture</title>"));
    assert!(index.contains("<em>module 1</em>"));
    assert!(index.contains(r#"<a href="module1.html">Numbers</a>"#));
    assert!(index.contains(r#"<a href="module2.html">module2</a>"#));
    assert!(destination.join("logo.png").is_file());

    let page = fs::read_to_string(destination.join("module1.html")).unwrap();
    assert!(page.contains(r#"type="radio""#));
    assert!(page.contains("module1_imscc.zip"));

    let gift = fs::read_to_string(
        destination.join("module1/module1.questions_bank.gift.txt"),
    )
    .unwrap();
    assert!(gift.starts_with("$CATEGORY: $course$/module1 section 1.1"));
    let videos =
        fs::read_to_string(destination.join("module2/module2.video_iframe_list.txt")).unwrap();
    assert_eq!(videos, "https://player.vimeo.com/video/42\n");

    assert_eq!(fs::read(destination.join("module1/media/chart.png")).unwrap(), [1, 2, 3]);
    assert!(destination.join("module1_imscc.zip").is_file());
    assert!(destination.join("module2_edx.tar.gz").is_file());
}

#[test]
fn test_build_replaces_destination() {
    let repo_dir = tempfile::tempdir().unwrap();
    let out_dir = tempfile::tempdir().unwrap();
    write(repo_dir.path(), "module1/a.md", b"# One\ntext\n");
    write(out_dir.path(), "stale.html", b"old");

    let repo = Repository::load(repo_dir.path()).unwrap();
    let sources = repo.sources().modules;
    let course = Compiler::new(CompileOptions::default()).compile_course(
        &repo.title,
        repo.logo_identity(),
        &sources,
    );
    SiteBuilder::new(SiteTemplates::new().unwrap())
        .build(&repo, &sources, &course, out_dir.path())
        .unwrap();

    assert!(!out_dir.path().join("stale.html").exists());
    assert!(out_dir.path().join("module1.html").is_file());
    let index = fs::read_to_string(out_dir.path().join("index.html")).unwrap();
    assert!(index.contains("home-default"));
    assert!(!out_dir.path().join("module1_imscc.zip").exists());
}

#[test]
fn test_build_into_repository_refused() {
    let repo_dir = tempfile::tempdir().unwrap();
    write(repo_dir.path(), "module1/a.md", b"# One\ntext\n");

    let repo = Repository::load(repo_dir.path()).unwrap();
    let sources = repo.sources().modules;
    let course = Compiler::new(CompileOptions::default()).compile_course(
        &repo.title,
        repo.logo_identity(),
        &sources,
    );
    let result = SiteBuilder::new(SiteTemplates::new().unwrap()).build(
        &repo,
        &sources,
        &course,
        repo_dir.path(),
    );

    assert!(matches!(result, Err(SiteError::DestinationIsRepository(_))));
    assert!(repo_dir.path().join("module1/a.md").is_file());
}

#[test]
fn test_build_site_skips_non_utf8_module() {
    let repo_dir = tempfile::tempdir().unwrap();
    let out_dir = tempfile::tempdir().unwrap();
    write(repo_dir.path(), "module1/a.md", b"# One\ntext\n");
    write(repo_dir.path(), "module2/a.md", &[0xff, 0xfe]);

    let repo = Repository::load(repo_dir.path()).unwrap();
    let sources = repo.sources();
    assert_eq!(sources.unreadable.len(), 1);
    assert_eq!(sources.unreadable[0].name, "module2");

    let course = Compiler::new(CompileOptions::default()).compile_course(
        &repo.title,
        repo.logo_identity(),
        &sources.modules,
    );
    SiteBuilder::new(SiteTemplates::new().unwrap())
        .build(&repo, &sources.modules, &course, out_dir.path())
        .unwrap();

    assert!(out_dir.path().join("module1.html").is_file());
    assert!(!out_dir.path().join("module2.html").exists());
    let index = fs::read_to_string(out_dir.path().join("index.html")).unwrap();
    assert!(!index.contains("module2.html"));
}
