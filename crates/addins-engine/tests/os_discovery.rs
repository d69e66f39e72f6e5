use addins_common::AddinsConfig;
use addins_engine::{ExtensionManager, HostInfo};
use serde_json::json;
use std::fs;
use std::path::Path;

fn write_module(path: &Path, descriptor: serde_json::Value) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, b"").unwrap();
    let mut descriptor_path = path.as_os_str().to_os_string();
    descriptor_path.push(".metadata.json");
    fs::write(descriptor_path, descriptor.to_string()).unwrap();
}

fn write_host(path: &Path) {
    write_module(
        path,
        json!({
            "name": "Host",
            "version": "1.0",
            "attributes": [{
                "type_name": "Addins.ExtensionPointAttribute",
                "args": ["/Host/Drivers", "Host.IDriver"]
            }]
        }),
    );
}

fn write_driver(path: &Path) {
    write_module(
        path,
        json!({
            "name": "Vendor.Driver",
            "version": "1.0",
            "types": [{
                "full_name": "Vendor.Driver",
                "interfaces": ["Host.IDriver"],
                "attributes": [{ "type_name": "Addins.ExtensionAttribute" }]
            }]
        }),
    );
}

#[test]
fn test_discovery_on_disk() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let root = dir.path();

    write_host(&root.join("app/Host.dll"));
    write_driver(&root.join("addins/drivers/Vendor.Driver.dll"));
    fs::write(root.join("addins/main.addins"), "# drivers\ndrivers/\n")?;

    let mut manager = ExtensionManager::new(HostInfo::default());
    manager.find_extension_points(&[root.join("app/Host.dll")])?;
    manager.find_extension_modules(root.join("addins"))?;
    // Same directory through a different spelling
    manager.find_extension_modules(root.join("addins/drivers/.."))?;

    assert_eq!(manager.candidates().len(), 1);
    let drivers = manager.extension_nodes("/Host/Drivers")?;
    assert_eq!(drivers.len(), 1);
    assert_eq!(drivers[0].type_name(), "Vendor.Driver");
    Ok(())
}

#[test]
fn test_config_paths_are_relative_to_the_config_file() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let root = dir.path();

    write_host(&root.join("app/Host.dll"));
    write_driver(&root.join("addins/Vendor.Driver.dll"));
    let config_path = root.join("addins.toml");
    fs::write(
        &config_path,
        "[discovery]\npoints = [\"app/Host.dll\"]\ndirectories = [\"addins\"]\n",
    )?;

    let config = AddinsConfig::load(&config_path)?;
    let mut manager = ExtensionManager::from_config(&config)?;

    assert_eq!(manager.candidates().len(), 1);
    let drivers = manager.extension_nodes("/Host/Drivers")?;
    assert_eq!(drivers.len(), 1);
    assert_eq!(drivers[0].type_name(), "Vendor.Driver");
    Ok(())
}

#[test]
fn test_missing_directory_error_names_the_path() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("not-there");

    let mut manager = ExtensionManager::new(HostInfo::default());
    let err = manager.find_extension_modules(&missing).unwrap_err();

    assert!(err.to_string().contains("not-there"));
}
