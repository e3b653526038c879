//! Build script to embed Windows resource metadata into the tray executable

fn main() {
    #[cfg(windows)]
    {
        let mut res = winresource::WindowsResource::new();

        res.set("ProductName", "Lantern");
        res.set("CompanyName", "Lantern");
        res.set("FileDescription", "Lantern.Tray");
        res.set("InternalName", "Lantern.Tray");
        res.set("OriginalFilename", "lantern_tray.exe");
        res.set("ProductVersion", env!("CARGO_PKG_VERSION"));
        res.set("FileVersion", env!("CARGO_PKG_VERSION"));

        if let Err(e) = res.compile() {
            println!("cargo:warning=Failed to compile Windows resources: {}", e);
        }
    }
}
