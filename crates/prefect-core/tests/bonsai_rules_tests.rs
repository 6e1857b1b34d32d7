//! Tests for the built-in Bonsai Foundation rules

use prefect_core::rules::{
    BuildNoiseRule, EnforcementLevel, ExtraneousLicenseFilesRule, GitignoreRule, LaunchSettingsRule,
    MitLicenseRule, OnlyOneSolutionRule, PackageMetadataRule, ProjectHygieneRule, ProjectNameRule,
    ProjectsInSrcRule, SubmoduleRule,
};
use prefect_core::{Check, Repo, TemplateKind};
use prefect_test_utils::TestTree;
use prefect_test_utils::git::real_git_repo_with_commit;
use pretty_assertions::assert_eq;
use rstest::rstest;

const LICENSE: &str = "\
Copyright (c) Bonsai Foundation CIC and Contributors

Permission is hereby granted, free of charge, to any person obtaining a copy of
this software and associated documentation files (the \"Software\"), to deal in
the Software without restriction, including without limitation the rights to
use, copy, modify, merge, publish, distribute, sublicense, and/or sell copies
of the Software, and to permit persons to whom the Software is furnished to do
so, subject to the following conditions:

The above copyright notice and this permission notice shall be included in all
copies or substantial portions of the Software.

THE SOFTWARE IS PROVIDED \"AS IS\", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
SOFTWARE.";

const LIBRARY_PROJECT: &str = r#"<Project Sdk="Microsoft.NET.Sdk">
  <PropertyGroup>
    <Title>Bonsai - Widgets</Title>
    <Description>Bonsai library for widgets.</Description>
    <PackageTags>$(PackageTags) Widgets</PackageTags>
    <TargetFramework>net472</TargetFramework>
  </PropertyGroup>
</Project>
"#;

const LAUNCH_SETTINGS: &str = r#"{
  "profiles": {
    "Bonsai": {
      "commandName": "Executable",
      "executablePath": "$(BonsaiExecutablePath)",
      "commandLineArgs": "--lib:\"$(TargetDir).\"",
      "nativeDebugging": true
    }
  }
}"#;

fn open(tree: &TestTree) -> Repo {
    Repo::open(tree.root(), TemplateKind::BonsaiFoundation).unwrap()
}

fn widgets_repo() -> TestTree {
    let repo = TestTree::named("widgets");
    repo.fake_git();
    repo.file("Bonsai.Widgets.sln", "");
    repo
}

#[test]
fn test_project_name_rule() {
    let repo = TestTree::new();
    assert_eq!(
        ProjectNameRule.validate(&open(&repo)).unwrap().as_deref(),
        Some("Could not determine the project name for the repo.")
    );

    repo.file("Bonsai.Widgets.sln", "");
    repo.file("Bonsai.Widgets.Extra.sln", "");
    let snapshot = open(&repo);
    assert_eq!(ProjectNameRule.validate(&snapshot).unwrap(), None);
    assert_eq!(snapshot.project_name(), "Bonsai.Widgets");
}

#[test]
fn test_license_rule_accepts_standard_license() {
    let repo = widgets_repo();
    repo.file("LICENSE", LICENSE);
    let rule = MitLicenseRule::default();

    assert_eq!(rule.description(), "LICENSE contains the appropriate license");
    assert_eq!(rule.validate(&open(&repo)).unwrap(), None);
}

#[test]
fn test_license_rule_has_no_fixup() {
    let repo = widgets_repo();
    let rule = MitLicenseRule::default();

    assert_eq!(
        rule.validate(&open(&repo)).unwrap().as_deref(),
        Some("File 'LICENSE' must exist.")
    );
    assert!(!rule.fixup(&open(&repo)).unwrap());
    repo.assert_missing("LICENSE");
}

#[test]
fn test_license_rule_reports_trailing_whitespace() {
    let repo = widgets_repo();
    repo.file("LICENSE", format!("{LICENSE}\n\n"));

    assert_eq!(
        MitLicenseRule::default().validate(&open(&repo)).unwrap().as_deref(),
        Some("License file 'LICENSE' ends with extraneous whitespace.")
    );
}

#[test]
fn test_license_rule_relaxed_levels() {
    let repo = widgets_repo();
    let dated = LICENSE.replace(
        "Copyright (c) Bonsai Foundation CIC and Contributors",
        "The MIT License (MIT)\n\nCopyright (c) 2019 Someone",
    );
    repo.file("LICENSE", dated);

    let mit = MitLicenseRule::new(EnforcementLevel::MustBeMitLicense);
    assert_eq!(mit.validate(&open(&repo)).unwrap(), None);

    let foundation = MitLicenseRule::new(EnforcementLevel::MustBeBonsaiFoundation);
    assert_eq!(
        foundation.validate(&open(&repo)).unwrap().as_deref(),
        Some("License file 'LICENSE' contains attribution to 'Someone' rather than 'Bonsai Foundation CIC and Contributors'.")
    );
}

#[test]
fn test_extraneous_license_files() {
    let repo = widgets_repo();
    repo.file("LICENSE", LICENSE);
    repo.file("src/Bonsai.Widgets/LICENSE.txt", "");
    repo.file("docs/COPYING", "");
    repo.file("src/Externals/lib/LICENSE", "");
    repo.file("docs/bonsai-docfx/.git", "gitdir: ../../.git/modules/docfx");
    repo.file("docs/bonsai-docfx/LICENSE", "");
    repo.file("docs/licensing.md", "");

    assert_eq!(
        ExtraneousLicenseFilesRule.validate(&open(&repo)).unwrap().as_deref(),
        Some(
            "'docs/COPYING' appears to be a non-conformant license file.\n\
             'src/Bonsai.Widgets/LICENSE.txt' appears to be a non-conformant license file."
        )
    );
}

#[test]
fn test_gitignore_rule_reports_and_fixes() {
    let repo = widgets_repo();
    repo.file(".gitignore", "bin/\nobj/\n.vs/\n*.user\n");
    let rule = GitignoreRule;

    assert_eq!(
        rule.validate(&open(&repo)).unwrap().as_deref(),
        Some(
            "'.gitignore' does not meet the standard for modern .NET projects:\n    \
             Pattern 'bin/' is legacy and should be removed.\n    \
             Pattern 'obj/' is legacy and should be removed.\n    \
             Pattern '**/.bonsai/Bonsai.exe*' was expected but not found.\n    \
             Pattern '**/.bonsai/Packages/' was expected but not found.\n    \
             Pattern '**/.bonsai/Settings/' was expected but not found.\n    \
             Pattern '/artifacts/' was expected but not found."
        )
    );

    assert!(rule.fixup(&open(&repo)).unwrap());
    assert_eq!(
        repo.read(".gitignore"),
        "**/.bonsai/Bonsai.exe*\n**/.bonsai/Packages/\n**/.bonsai/Settings/\n.vs/\n/artifacts/\n*.user\n"
    );
    assert_eq!(rule.validate(&open(&repo)).unwrap(), None);
}

#[test]
fn test_gitignore_rule_creates_missing_file() {
    let repo = widgets_repo();
    assert_eq!(
        GitignoreRule.validate(&open(&repo)).unwrap().as_deref(),
        Some("File '.gitignore' must exist.")
    );
    assert!(GitignoreRule.fixup(&open(&repo)).unwrap());
    assert_eq!(GitignoreRule.validate(&open(&repo)).unwrap(), None);
}

#[test]
fn test_package_metadata_rule() {
    let repo = widgets_repo();
    repo.file(
        "build/Package.props",
        r#"<Project>
  <PropertyGroup>
    <PackageProjectUrl>https://bonsai-rx.org/widgets</PackageProjectUrl>
    <Copyright>Copyright © Bonsai Foundation CIC and Contributors</Copyright>
  </PropertyGroup>
</Project>"#,
    );
    repo.file("src/Bonsai.Widgets/Bonsai.Widgets.csproj", LIBRARY_PROJECT);
    repo.file(
        "src/Bonsai.Widgets.Tool/Bonsai.Widgets.Tool.csproj",
        r#"<Project Sdk="Microsoft.NET.Sdk">
  <PropertyGroup>
    <PackAsTool>true</PackAsTool>
    <Title>Widget Tool</Title>
    <PackageTags>Widgets</PackageTags>
  </PropertyGroup>
</Project>"#,
    );
    repo.file("tests/Bonsai.Widgets.Tests/Bonsai.Widgets.Tests.csproj", "<Project />");

    assert_eq!(
        PackageMetadataRule.validate(&open(&repo)).unwrap().as_deref(),
        Some(
            "'src/Bonsai.Widgets.Tool/Bonsai.Widgets.Tool.csproj': Title should be in the form of 'Bonsai Project Name'\n\
             'src/Bonsai.Widgets.Tool/Bonsai.Widgets.Tool.csproj': The package should have a description.\n\
             'src/Bonsai.Widgets.Tool/Bonsai.Widgets.Tool.csproj': Projects should only add package tags, not replace them."
        )
    );
}

#[test]
fn test_package_metadata_rule_requires_package_props() {
    let repo = widgets_repo();
    assert_eq!(
        PackageMetadataRule.validate(&open(&repo)).unwrap().as_deref(),
        Some("'build/Package.props' does not exist.")
    );

    repo.file("build/Package.props", "<Project><PropertyGroup /></Project>");
    assert_eq!(
        PackageMetadataRule.validate(&open(&repo)).unwrap().as_deref(),
        Some(
            "'build/Package.props': PackageProjectUrl should be 'https://bonsai-rx.org/widgets'\n\
             'build/Package.props': Copyright should be 'Copyright © Bonsai Foundation CIC and Contributors'"
        )
    );
}

#[rstest]
#[case("src/Bonsai.Widgets/Bonsai.Widgets.csproj", true)]
#[case("tests/Bonsai.Widgets.Tests/Bonsai.Widgets.Tests.csproj", true)]
#[case(".bonsai/Extensions.csproj", true)]
#[case("tests/Helpers/Helpers.csproj", false)]
#[case("Bonsai.Widgets.csproj", false)]
fn test_projects_in_src_rule(#[case] path: &str, #[case] allowed: bool) {
    let repo = widgets_repo();
    repo.file(path, "<Project />");

    let result = ProjectsInSrcRule.validate(&open(&repo)).unwrap();
    if allowed {
        assert_eq!(result, None);
    } else {
        assert_eq!(result, Some(format!("'{path}' is not within the 'src' directory.")));
    }
}

#[test]
fn test_project_hygiene_rule_groups_problems_per_project() {
    let repo = widgets_repo();
    repo.file("src/Bonsai.Widgets/Bonsai.Widgets.csproj", LIBRARY_PROJECT);
    repo.file(
        "src/Bonsai.Legacy/Bonsai.Legacy.csproj",
        r#"<Project Sdk="Microsoft.NET.Sdk">
  <PropertyGroup>
    <Version>1.0.0</Version>
    <TargetFramework>net48</TargetFramework>
  </PropertyGroup>
</Project>"#,
    );
    repo.file(".bonsai/Extensions.csproj", "<Project><PropertyGroup><Version>1</Version></PropertyGroup></Project>");

    assert_eq!(
        ProjectHygieneRule.validate(&open(&repo)).unwrap().as_deref(),
        Some(
            "'src/Bonsai.Legacy/Bonsai.Legacy.csproj' contains problems:\n    \
             Forbidden property 'Version'\n    \
             Target framework 'net48' is not permitted."
        )
    );
}

#[test]
fn test_build_noise_rule() {
    let repo = widgets_repo();
    repo.file("build/Common.props", "\u{feff}<?xml version=\"1.0\"?>\n<Project />");
    repo.file("build/Common.targets", "<Project ToolsVersion=\"15.0\" />");
    repo.file("src/Bonsai.Widgets/Bonsai.Widgets.csproj", LIBRARY_PROJECT);
    repo.file("artifacts/obj/generated.props", "<?xml version=\"1.0\"?><Project />");

    assert_eq!(
        BuildNoiseRule.validate(&open(&repo)).unwrap().as_deref(),
        Some(
            "'build/Common.props' contains an XML declaration.\n\
             'build/Common.targets' contains legacy attribute 'ToolsVersion'"
        )
    );
}

#[test]
fn test_build_noise_rule_surfaces_malformed_xml_as_error() {
    let repo = widgets_repo();
    repo.file("build/Broken.props", "<Project>");
    assert!(BuildNoiseRule.validate(&open(&repo)).is_err());
}

#[test]
fn test_launch_settings_rule() {
    let repo = widgets_repo();
    repo.file("src/Bonsai.Widgets/Bonsai.Widgets.csproj", LIBRARY_PROJECT);
    repo.file("src/Bonsai.Gadgets/Bonsai.Gadgets.csproj", LIBRARY_PROJECT);
    repo.file("src/Bonsai.Gadgets/Properties/launchSettings.json", "{}");
    repo.file(
        "src/Bonsai.Tool/Bonsai.Tool.csproj",
        "<Project><PropertyGroup><PACKASTOOL>True</PACKASTOOL></PropertyGroup></Project>",
    );
    repo.file("tests/Bonsai.Widgets.Tests/Bonsai.Widgets.Tests.csproj", "<Project />");
    let rule = LaunchSettingsRule;

    assert_eq!(
        rule.validate(&open(&repo)).unwrap().as_deref(),
        Some(
            "Not all 'launchSettings.json' files are correct:\n    \
             Contents of 'src/Bonsai.Gadgets/Properties/launchSettings.json' do not match the reference.\n    \
             File 'src/Bonsai.Widgets/Properties/launchSettings.json' must exist."
        )
    );

    assert!(rule.fixup(&open(&repo)).unwrap());
    assert_eq!(rule.validate(&open(&repo)).unwrap(), None);
    assert_eq!(
        repo.read("src/Bonsai.Widgets/Properties/launchSettings.json").replace("\r\n", "\n"),
        LAUNCH_SETTINGS
    );
    repo.assert_missing("src/Bonsai.Tool/Properties/launchSettings.json");
}

#[test]
fn test_launch_settings_rule_rewrites_undecodable_file() {
    let repo = widgets_repo();
    repo.file("src/Bonsai.Widgets/Bonsai.Widgets.csproj", LIBRARY_PROJECT);
    repo.file("src/Bonsai.Widgets/Properties/launchSettings.json", b"{\xff}");
    let rule = LaunchSettingsRule;

    assert_eq!(
        rule.validate(&open(&repo)).unwrap().as_deref(),
        Some(
            "Not all 'launchSettings.json' files are correct:\n    \
             Contents of 'src/Bonsai.Widgets/Properties/launchSettings.json' do not match the reference."
        )
    );
    assert!(rule.fixup(&open(&repo)).unwrap());
    assert_eq!(rule.validate(&open(&repo)).unwrap(), None);
}

#[test]
fn test_only_one_solution_rule() {
    let repo = widgets_repo();
    assert_eq!(OnlyOneSolutionRule.validate(&open(&repo)).unwrap(), None);

    repo.file("Bonsai.Widgets.Extras.sln", "");
    assert_eq!(
        OnlyOneSolutionRule.validate(&open(&repo)).unwrap().as_deref(),
        Some("Multiple solution files are present in the root.")
    );
}

#[test]
fn test_submodule_rule_requires_docfx_tools() {
    let repo = widgets_repo();
    assert_eq!(
        SubmoduleRule::default().validate(&open(&repo)).unwrap().as_deref(),
        Some(
            "Expected to find submodule at 'docs/bonsai-docfx' pointed to bonsai-rx/docfx-tools @ \
             5b584cadc5f1e3088f4972469243df2e3faf6925"
        )
    );
}

#[test]
fn test_submodule_rule_reports_forbidden_and_misplaced_submodules() {
    let repo = widgets_repo();
    repo.file(
        ".gitmodules",
        "[submodule \"docs/docfx-assets\"]\n\
         \tpath = docs/docfx-assets\n\
         \turl = https://github.com/bonsai-rx/docfx-assets\n\
         [submodule \"docfx\"]\n\
         \tpath = docfx\n\
         \turl = https://github.com/bonsai-rx/docfx-tools.git\n",
    );

    assert_eq!(
        SubmoduleRule::default().validate(&open(&repo)).unwrap().as_deref(),
        Some(
            "Git submodule 'docs/docfx-assets' at 'docs/docfx-assets' is not permitted.\n\
             Git submodule 'docfx' at 'docfx' is expected to be at 'docs/bonsai-docfx'\n\
             Git submodule 'docfx' @ 'docfx' does not appear to be checked out, ensure submodules are up-to-date."
        )
    );
}

#[test]
fn test_submodule_rule_compares_checked_out_revision() {
    let repo = widgets_repo();
    repo.file(
        ".gitmodules",
        "[submodule \"docs/bonsai-docfx\"]\n\
         \tpath = docs/bonsai-docfx\n\
         \turl = https://github.com/bonsai-rx/docfx-tools\n",
    );
    repo.file("docs/bonsai-docfx/README.md", "docfx tools");
    let revision = real_git_repo_with_commit(&repo.path("docs/bonsai-docfx"));

    assert_eq!(
        SubmoduleRule::default().validate(&open(&repo)).unwrap(),
        Some(format!(
            "Git submodule 'docs/bonsai-docfx' points to Git revision '{revision}' rather than the expected \
             '5b584cadc5f1e3088f4972469243df2e3faf6925' (submodule is likely out-of-date)"
        ))
    );
}
