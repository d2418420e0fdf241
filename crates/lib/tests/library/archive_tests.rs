//! Thin package round trips.

use std::fs;
use std::io::Write;

use brisk_lib::archive::{EntryIdentity, Packer, extract_archive};
use brisk_lib::platform::os::Os;
use tempfile::TempDir;

#[test]
fn shared_files_are_stored_once_and_restored_everywhere() {
  let temp = TempDir::new().unwrap();
  let src = temp.path().join("src");
  for project in ["Api", "Web"] {
    let dir = src.join(project);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("Common.dll"), "common bits").unwrap();
    fs::write(dir.join(format!("{project}.dll")), project).unwrap();
  }

  let archive = temp.path().join("out").join("Rocket_2.1.0.zip");
  let mut packer = Packer::new(EntryIdentity::Content);
  packer.add_directory(&src.join("Api"), "Api").unwrap();
  packer.add_directory(&src.join("Web"), "Web").unwrap();
  let summary = packer.write(&archive).unwrap();

  assert_eq!(summary.stored_entries, 3);
  assert_eq!(summary.destination_files, 4);

  let root = temp.path().join("unpacked");
  let extracted = extract_archive(&archive, &root, Os::host()).unwrap();
  assert_eq!(extracted.written.len(), 4);
  assert!(extracted.had_metadata);
  assert_eq!(fs::read_to_string(root.join("Api/Common.dll")).unwrap(), "common bits");
  assert_eq!(fs::read_to_string(root.join("Web/Common.dll")).unwrap(), "common bits");
  assert_eq!(fs::read_to_string(root.join("Web/Web.dll")).unwrap(), "Web");

  // Deleting the output and extracting again yields the same tree.
  fs::remove_dir_all(&root).unwrap();
  let again = extract_archive(&archive, &root, Os::host()).unwrap();
  assert_eq!(again.written.len(), 4);
  assert_eq!(fs::read_to_string(root.join("Api/Api.dll")).unwrap(), "Api");
}

#[test]
fn backslash_destinations_from_foreign_packages_are_normalized() {
  let temp = TempDir::new().unwrap();
  let archive = temp.path().join("pkg.zip");

  let mut writer = zip::ZipWriter::new(fs::File::create(&archive).unwrap());
  let options = zip::write::SimpleFileOptions::default();
  writer.start_file("app.dll", options).unwrap();
  writer.write_all(b"app").unwrap();
  writer.start_file("_zipmetadata.json", options).unwrap();
  writer
    .write_all(br#"{"Items":[{"FileName":"app.dll","DestinationFiles":["bin\\app.dll"]}]}"#)
    .unwrap();
  writer.finish().unwrap();

  let root = temp.path().join("out");
  let summary = extract_archive(&archive, &root, Os::Linux).unwrap();

  assert_eq!(summary.written, vec![root.join("bin/app.dll")]);
  assert_eq!(fs::read_to_string(root.join("bin").join("app.dll")).unwrap(), "app");
}

#[test]
fn packer_normalizes_backslash_destinations() {
  let temp = TempDir::new().unwrap();
  let source = temp.path().join("app.dll");
  fs::write(&source, "app").unwrap();

  let mut packer = Packer::new(EntryIdentity::Content);
  packer.add_file(&source, "bin\\app.dll");
  let (metadata, _) = packer.plan().unwrap();

  assert_eq!(metadata.items[0].destination_files, vec!["bin/app.dll"]);
}
