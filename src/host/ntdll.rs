//! Kernel Decompression API (ntdll)
//!
//! The compression envelope on newer artifacts uses the XPRESS family, which
//! only the `RtlDecompressBufferEx` / `RtlGetCompressionWorkSpaceSize` pair
//! in ntdll.dll implements. The scratch workspace is an owned `Vec`, so it
//! is released on every exit path, success or failure.
//!
//! On non-Windows targets both calls report `HostError::Unsupported`, which
//! the pipeline degrades to "artifact skipped".

use crate::error::HostError;

#[cfg(windows)]
mod imp {
    use super::HostError;

    #[link(name = "ntdll")]
    extern "system" {
        fn RtlGetCompressionWorkSpaceSize(
            compression_format_and_engine: u16,
            compress_buffer_workspace_size: *mut u32,
            compress_fragment_workspace_size: *mut u32,
        ) -> i32;

        fn RtlDecompressBufferEx(
            compression_format: u16,
            uncompressed_buffer: *mut u8,
            uncompressed_buffer_size: u32,
            compressed_buffer: *const u8,
            compressed_buffer_size: u32,
            final_uncompressed_size: *mut u32,
            workspace: *mut u8,
        ) -> i32;
    }

    pub fn workspace_size(format: u16) -> Result<(u32, u32), HostError> {
        let mut buffer_size = 0u32;
        let mut fragment_size = 0u32;
        let status = unsafe {
            RtlGetCompressionWorkSpaceSize(format, &mut buffer_size, &mut fragment_size)
        };
        if status != 0 {
            return Err(HostError::Api(format!(
                "RtlGetCompressionWorkSpaceSize: NTSTATUS {status:#x}"
            )));
        }
        Ok((buffer_size, fragment_size))
    }

    pub fn decompress(format: u16, input: &[u8], expected_len: usize) -> Result<Vec<u8>, HostError> {
        let (workspace_len, _fragment) = workspace_size(format)?;

        let mut workspace = vec![0u8; workspace_len as usize];
        let mut output = vec![0u8; expected_len];
        let mut final_len = 0u32;

        let status = unsafe {
            RtlDecompressBufferEx(
                format,
                output.as_mut_ptr(),
                output.len() as u32,
                input.as_ptr(),
                input.len() as u32,
                &mut final_len,
                workspace.as_mut_ptr(),
            )
        };
        drop(workspace);

        if status != 0 {
            return Err(HostError::Api(format!(
                "RtlDecompressBufferEx: NTSTATUS {status:#x}"
            )));
        }
        Ok(output)
    }
}

#[cfg(not(windows))]
mod imp {
    use super::HostError;

    pub fn workspace_size(_format: u16) -> Result<(u32, u32), HostError> {
        Err(HostError::Unsupported)
    }

    pub fn decompress(
        _format: u16,
        _input: &[u8],
        _expected_len: usize,
    ) -> Result<Vec<u8>, HostError> {
        Err(HostError::Unsupported)
    }
}

pub fn workspace_size(format: u16) -> Result<(u32, u32), HostError> {
    imp::workspace_size(format)
}

pub fn decompress(format: u16, input: &[u8], expected_len: usize) -> Result<Vec<u8>, HostError> {
    imp::decompress(format, input, expected_len)
}
