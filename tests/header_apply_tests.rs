use std::fs;
use std::path::Path;

use anyhow::Result;
use devtools::header::{ApplyOutcome, HeaderApplier, HeaderError, HeaderRenderer, stamp};
use devtools::registry::{CommentFamily, ExtensionRegistry};
use devtools::symbols::{CommentSymbols, SymbolError};
use devtools::templates::HeaderConfig;
use tempfile::tempdir;

fn mit_config() -> HeaderConfig {
  HeaderConfig {
    title: "MIT License".to_string(),
    year: "2024".to_string(),
    holder: "Acme Corp".to_string(),
    spdx_id: "MIT".to_string(),
    ..HeaderConfig::default()
  }
}

fn proprietary_config() -> HeaderConfig {
  HeaderConfig {
    title: "Proprietary License".to_string(),
    spdx_id: "none".to_string(),
    oss: false,
    ..mit_config()
  }
}

fn applier(config: &HeaderConfig) -> HeaderApplier {
  HeaderApplier::new(config, &ExtensionRegistry::builtin())
}

fn write(dir: &Path, name: &str, content: &str) -> Result<std::path::PathBuf> {
  let path = dir.join(name);
  fs::write(&path, content)?;
  Ok(path)
}

#[test]
fn test_empty_js_file_gets_star_block() -> Result<()> {
  let temp_dir = tempdir()?;
  let path = write(temp_dir.path(), "test.js", "")?;

  assert_eq!(applier(&mit_config()).apply(&path)?, ApplyOutcome::Applied);

  let content = fs::read_to_string(&path)?;
  let expected = "/*\n\
 *   MIT License\n\
 *\n\
 *   Copyright (c) 2024, Acme Corp\n\
 *\n\
 *   The contents of this file are subject to the terms and conditions defined in the License.\n\
 *   You may not use, modify, or distribute this file except in compliance with the License.\n\
 *\n\
 *   SPDX-License-Identifier: MIT\n\
 */\n";
  assert_eq!(content, expected);
  Ok(())
}

#[test]
fn test_proprietary_header_on_python_file() -> Result<()> {
  let temp_dir = tempdir()?;
  let path = write(temp_dir.path(), "test.py", "CONTENTS")?;

  assert_eq!(applier(&proprietary_config()).apply(&path)?, ApplyOutcome::Applied);

  let content = fs::read_to_string(&path)?;
  let lines: Vec<&str> = content.lines().collect();
  assert_eq!(lines[0], "#");
  assert_eq!(lines[1], "#   Proprietary License");
  let block: Vec<&str> = lines.iter().take_while(|line| line.starts_with('#')).copied().collect();
  assert_eq!(block[block.len() - 2], "#   All rights reserved.");
  assert_eq!(block[block.len() - 1], "#");
  assert_eq!(lines[block.len()], "");
  assert_eq!(lines[block.len() + 1], "CONTENTS");
  assert!(!content.contains("SPDX"));
  Ok(())
}

#[test]
fn test_shebang_is_kept_and_second_apply_skips() -> Result<()> {
  let temp_dir = tempdir()?;
  let path = write(temp_dir.path(), "test.py", "#! usr/bin/python\nCONTENTS\n")?;
  let applier = applier(&mit_config());

  assert_eq!(applier.apply(&path)?, ApplyOutcome::Applied);
  let first = fs::read_to_string(&path)?;
  assert!(first.starts_with("#! usr/bin/python\n#\n#   MIT License\n"));
  assert!(first.ends_with("#   SPDX-License-Identifier: MIT\n#\n\nCONTENTS\n"));

  assert_eq!(applier.apply(&path)?, ApplyOutcome::Skipped);
  assert_eq!(fs::read_to_string(&path)?, first);
  Ok(())
}

#[test]
fn test_idempotent_across_families() -> Result<()> {
  let temp_dir = tempdir()?;
  let applier = applier(&mit_config());

  for (name, content) in [
    ("main.rs", "fn main() {}\n"),
    ("lib.c", "int x;\n"),
    ("run.sh", "#!/bin/sh\necho hi\n"),
    ("conf.yaml", "key: value\n"),
    ("empty.ts", ""),
  ] {
    let path = write(temp_dir.path(), name, content)?;
    assert_eq!(applier.apply(&path)?, ApplyOutcome::Applied, "{name}");
    let once = fs::read_to_string(&path)?;
    assert_eq!(applier.apply(&path)?, ApplyOutcome::Skipped, "{name}");
    assert_eq!(fs::read_to_string(&path)?, once, "{name}");
  }
  Ok(())
}

#[test]
fn test_unsupported_file_is_untouched() -> Result<()> {
  let temp_dir = tempdir()?;
  let content = "# looks like a comment\nplain text\n";
  let path = write(temp_dir.path(), "notes.txt", content)?;
  let no_ext = write(temp_dir.path(), "Makefile", content)?;
  let applier = applier(&mit_config());

  assert_eq!(applier.apply(&path)?, ApplyOutcome::Unsupported);
  assert_eq!(applier.apply(&no_ext)?, ApplyOutcome::Unsupported);
  assert_eq!(fs::read_to_string(&path)?, content);
  assert_eq!(fs::read_to_string(&no_ext)?, content);
  Ok(())
}

#[test]
fn test_extension_match_is_case_sensitive() -> Result<()> {
  let temp_dir = tempdir()?;
  let upper = write(temp_dir.path(), "script.PY", "x = 1\n")?;
  let r_upper = write(temp_dir.path(), "analysis.R", "x <- 1\n")?;
  let applier = applier(&mit_config());

  assert_eq!(applier.apply(&upper)?, ApplyOutcome::Unsupported);
  assert_eq!(applier.apply(&r_upper)?, ApplyOutcome::Applied);
  Ok(())
}

#[test]
fn test_alias_header_is_recognized() -> Result<()> {
  let temp_dir = tempdir()?;
  let renderer = HeaderRenderer::new(&mit_config());
  let star = renderer.render(&CommentFamily::star());
  let alias_text = star.alias_text().expect("star family has an alias form");
  assert!(alias_text.starts_with("//\n//   MIT License\n"));

  let content = format!("{alias_text}int main(void) {{ return 0; }}\n");
  let path = write(temp_dir.path(), "main.c", &content)?;

  assert_eq!(applier(&mit_config()).apply(&path)?, ApplyOutcome::Skipped);
  assert_eq!(fs::read_to_string(&path)?, content);
  Ok(())
}

#[test]
fn test_outdated_header_is_replaced() -> Result<()> {
  let temp_dir = tempdir()?;
  let old = applier(&HeaderConfig {
    year: "2019".to_string(),
    ..mit_config()
  });
  let current = applier(&mit_config());
  let path = write(temp_dir.path(), "app.java", "class App {}\n")?;

  old.apply(&path)?;
  assert!(fs::read_to_string(&path)?.contains("2019"));

  assert_eq!(current.apply(&path)?, ApplyOutcome::Applied);
  let content = fs::read_to_string(&path)?;
  assert!(!content.contains("2019"));
  assert_eq!(content.matches("MIT License").count(), 1);
  assert!(content.ends_with(" */\n\nclass App {}\n"));
  Ok(())
}

#[test]
fn test_outdated_alias_header_is_replaced_with_primary_form() -> Result<()> {
  let temp_dir = tempdir()?;
  let content = "//\n//   Old License\n//\n\nfn main() {}\n";
  let path = write(temp_dir.path(), "main.rs", content)?;

  assert_eq!(applier(&mit_config()).apply(&path)?, ApplyOutcome::Applied);
  let updated = fs::read_to_string(&path)?;
  assert!(updated.starts_with("/*\n *   MIT License\n"));
  assert!(!updated.contains("Old License"));
  assert!(updated.ends_with(" */\n\nfn main() {}\n"));
  Ok(())
}

#[test]
fn test_rust_doc_comments_are_not_a_header() -> Result<()> {
  let temp_dir = tempdir()?;
  let content = "//! Crate docs\n\n/// Item docs\npub fn f() {}\n";
  let path = write(temp_dir.path(), "lib.rs", content)?;

  assert_eq!(applier(&mit_config()).apply(&path)?, ApplyOutcome::Applied);
  let updated = fs::read_to_string(&path)?;
  assert!(updated.ends_with(" */\n\n//! Crate docs\n\n/// Item docs\npub fn f() {}\n"));
  Ok(())
}

#[test]
fn test_unterminated_star_block_is_body() -> Result<()> {
  let temp_dir = tempdir()?;
  let content = "/*\n * never closed\nint x;\n";
  let path = write(temp_dir.path(), "x.c", content)?;

  assert_eq!(applier(&mit_config()).apply(&path)?, ApplyOutcome::Applied);
  assert!(fs::read_to_string(&path)?.ends_with(" */\n\n/*\n * never closed\nint x;\n"));
  Ok(())
}

#[test]
fn test_missing_file_with_supported_extension() {
  let result = applier(&mit_config()).apply(Path::new("/definitely/not/here/app.py"));
  assert!(matches!(result, Err(HeaderError::FileNotFound { .. })));
}

#[test]
fn test_directory_with_supported_extension() -> Result<()> {
  let temp_dir = tempdir()?;
  let dir = temp_dir.path().join("pkg.py");
  fs::create_dir(&dir)?;
  assert!(matches!(
    applier(&mit_config()).apply(&dir),
    Err(HeaderError::FileNotFound { .. })
  ));
  Ok(())
}

#[test]
fn test_missing_file_with_unsupported_extension() -> Result<()> {
  let outcome = applier(&mit_config()).apply(Path::new("/definitely/not/here/notes.txt"))?;
  assert_eq!(outcome, ApplyOutcome::Unsupported);
  Ok(())
}

#[test]
fn test_crlf_line_endings_are_kept() -> Result<()> {
  let temp_dir = tempdir()?;
  let path = write(temp_dir.path(), "win.py", "print(1)\r\nprint(2)\r\n")?;
  let applier = applier(&mit_config());

  assert_eq!(applier.apply(&path)?, ApplyOutcome::Applied);
  let content = fs::read_to_string(&path)?;
  assert!(content.starts_with("#\r\n#   MIT License\r\n"));
  assert!(content.ends_with("#\r\n\r\nprint(1)\r\nprint(2)\r\n"));
  assert!(!content.replace("\r\n", "").contains('\n'));

  assert_eq!(applier.apply(&path)?, ApplyOutcome::Skipped);
  Ok(())
}

#[test]
fn test_non_utf8_file_is_an_io_error() -> Result<()> {
  let temp_dir = tempdir()?;
  let path = temp_dir.path().join("binary.py");
  fs::write(&path, [0x66, 0x6f, 0xff, 0xfe, 0x0a])?;

  assert!(matches!(
    applier(&mit_config()).apply(&path),
    Err(HeaderError::Io { .. })
  ));
  assert_eq!(fs::read(&path)?, vec![0x66, 0x6f, 0xff, 0xfe, 0x0a]);
  Ok(())
}

#[test]
fn test_custom_spaces() -> Result<()> {
  let temp_dir = tempdir()?;
  let path = write(temp_dir.path(), "a.sh", "echo hi\n")?;
  let config = HeaderConfig {
    spaces: 1,
    ..mit_config()
  };

  applier(&config).apply(&path)?;
  assert!(fs::read_to_string(&path)?.starts_with("#\n# MIT License\n#\n# Copyright (c) 2024, Acme Corp\n"));
  Ok(())
}

#[test]
fn test_zero_spaces_is_idempotent() -> Result<()> {
  let temp_dir = tempdir()?;
  let config = HeaderConfig {
    spaces: 0,
    ..mit_config()
  };
  let applier = applier(&config);
  let path = write(temp_dir.path(), "a.py", "CONTENTS\n")?;

  assert_eq!(applier.apply(&path)?, ApplyOutcome::Applied);
  let once = fs::read_to_string(&path)?;
  assert!(once.starts_with("#\n#MIT License\n#\n#Copyright (c) 2024, Acme Corp\n"));

  assert_eq!(applier.apply(&path)?, ApplyOutcome::Skipped);
  assert_eq!(fs::read_to_string(&path)?, once);
  assert_eq!(once.matches("MIT License").count(), 1);
  Ok(())
}

#[test]
fn test_zero_spaces_alias_header_is_recognized() {
  let config = HeaderConfig {
    spaces: 0,
    ..mit_config()
  };
  let header = HeaderRenderer::new(&config).render(&CommentFamily::star());
  let alias_text = header.alias_text().expect("star family has an alias form");
  assert!(alias_text.starts_with("//\n//MIT License\n"));

  let content = format!("{alias_text}fn main() {{}}\n");
  assert_eq!(stamp(&content, &header), None);

  let outdated = "//\n//Old License\n//\n\nfn main() {}\n";
  let replaced = stamp(outdated, &header).expect("outdated alias header replaced");
  assert_eq!(replaced, format!("{}fn main() {{}}\n", header.text()));
}

#[test]
fn test_mixed_arity_is_rejected_in_every_position() {
  let cases = [
    CommentSymbols::new(("/*", "//"), " *", " */"),
    CommentSymbols::new("/*", (" *", "//"), " */"),
    CommentSymbols::new("/*", " *", (" */", "//")),
    CommentSymbols::new("/*", (" *", "//"), (" */", "//")),
    CommentSymbols::new(("/*", "//"), " *", (" */", "//")),
    CommentSymbols::new(("/*", "//"), (" *", "//"), " */"),
  ];
  for result in cases {
    assert!(matches!(result, Err(SymbolError::InvalidSymbolSet { .. })));
  }
}

#[test]
fn test_custom_registry() -> Result<()> {
  let temp_dir = tempdir()?;
  let sql = CommentFamily::new("dash", CommentSymbols::single("--", "--", "--"), [".sql"]);
  let registry = ExtensionRegistry::new(vec![sql])?;
  let applier = HeaderApplier::new(&mit_config(), &registry);

  let path = write(temp_dir.path(), "schema.sql", "CREATE TABLE t (id INT);\n")?;
  let py = write(temp_dir.path(), "a.py", "x = 1\n")?;
  assert_eq!(applier.apply(&path)?, ApplyOutcome::Applied);
  assert_eq!(applier.apply(&py)?, ApplyOutcome::Unsupported);
  assert!(fs::read_to_string(&path)?.starts_with("--\n--   MIT License\n"));
  Ok(())
}
