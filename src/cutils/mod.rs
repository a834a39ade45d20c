use std::ffi::CString;

/// Turn a `-1` result from a libc call into the corresponding `io::Error`.
pub fn cerr<Int: Copy + TryInto<libc::c_long>>(res: Int) -> std::io::Result<Int> {
    match res.try_into() {
        Ok(-1) => Err(std::io::Error::last_os_error()),
        _ => Ok(res),
    }
}

/// Copy a Rust string into a NUL-terminated C string, failing on interior NUL
/// bytes instead of silently truncating.
pub fn cstring(s: &str) -> std::io::Result<CString> {
    CString::new(s.as_bytes()).map_err(|_| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "string contains a NUL byte",
        )
    })
}
