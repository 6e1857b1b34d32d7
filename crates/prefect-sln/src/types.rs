//! Well-known project type GUIDs

use uuid::Uuid;

/// Solution folder pseudo-project.
pub const SOLUTION_FOLDER: Uuid = Uuid::from_u128(0x2150E333_8FDC_42A3_9474_1A3956D46DE8);

/// SDK-style C# project.
pub const CSHARP: Uuid = Uuid::from_u128(0xFAE04EC0_301F_11D3_BF4B_00C04F79EFBC);

/// Pre-SDK C# project type, superseded by [`CSHARP`].
pub const CSHARP_LEGACY: Uuid = Uuid::from_u128(0x9A19103F_16F7_4668_BE54_9A1E7A4F7556);

/// Visual C++ project.
pub const CPP: Uuid = Uuid::from_u128(0x8BC9CEB8_8B4A_11D0_8D11_00A0C91E3942);

/// Project type implied by a project file extension.
pub fn for_extension(extension: &str) -> Option<Uuid> {
    if extension.eq_ignore_ascii_case("csproj") {
        Some(CSHARP)
    } else if extension.eq_ignore_ascii_case("vcxproj") {
        Some(CPP)
    } else {
        None
    }
}

/// Render a GUID the way solution files spell it: braced, upper case.
pub fn format_guid(id: &Uuid) -> String {
    format!("{{{}}}", id.hyphenated().to_string().to_uppercase())
}
