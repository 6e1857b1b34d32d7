//! Parse and serialize tests for the solution model

use prefect_fs::LineEnding;
use prefect_sln::{Error, Solution, types};
use pretty_assertions::assert_eq;
use uuid::Uuid;

const SAMPLE: &str = "\u{feff}\r
Microsoft Visual Studio Solution File, Format Version 12.00\r
# Visual Studio Version 17\r
VisualStudioVersion = 17.0.31903.59\r
MinimumVisualStudioVersion = 10.0.40219.1\r
Project(\"{FAE04EC0-301F-11D3-BF4B-00C04F79EFBC}\") = \"Bonsai.Widgets\", \"src\\Bonsai.Widgets\\Bonsai.Widgets.csproj\", \"{0B4D2C3E-1A5F-4E6B-9C7D-8E9F0A1B2C3D}\"\r
EndProject\r
Project(\"{2150E333-8FDC-42A3-9474-1A3956D46DE8}\") = \"build\", \"build\", \"{5E6F7A8B-9C0D-4E1F-A2B3-C4D5E6F7A8B9}\"\r
\tProjectSection(SolutionItems) = preProject\r
\t\tbuild\\Common.props = build\\Common.props\r
\t\tbuild\\Package.props = build\\Package.props\r
\tEndProjectSection\r
EndProject\r
Project(\"{9A19103F-16F7-4668-BE54-9A1E7A4F7556}\") = \"Bonsai.Widgets.Design\", \"src\\Bonsai.Widgets.Design\\Bonsai.Widgets.Design.csproj\", \"{1C2D3E4F-5A6B-4C7D-8E9F-0A1B2C3D4E5F}\"\r
\tProjectSection(ProjectDependencies) = postProject\r
\t\t{0B4D2C3E-1A5F-4E6B-9C7D-8E9F0A1B2C3D} = {0B4D2C3E-1A5F-4E6B-9C7D-8E9F0A1B2C3D}\r
\tEndProjectSection\r
EndProject\r
Global\r
\tGlobalSection(SolutionConfigurationPlatforms) = preSolution\r
\t\tDebug|Any CPU = Debug|Any CPU\r
\t\tRelease|Any CPU = Release|Any CPU\r
\tEndGlobalSection\r
\tGlobalSection(ProjectConfigurationPlatforms) = postSolution\r
\t\t{0B4D2C3E-1A5F-4E6B-9C7D-8E9F0A1B2C3D}.Debug|Any CPU.ActiveCfg = Debug|Any CPU\r
\t\t{0B4D2C3E-1A5F-4E6B-9C7D-8E9F0A1B2C3D}.Debug|Any CPU.Build.0 = Debug|Any CPU\r
\t\t{0B4D2C3E-1A5F-4E6B-9C7D-8E9F0A1B2C3D}.Release|Any CPU.ActiveCfg = Release|Any CPU\r
\t\t{0B4D2C3E-1A5F-4E6B-9C7D-8E9F0A1B2C3D}.Release|Any CPU.Build.0 = Release|Any CPU\r
\tEndGlobalSection\r
\tGlobalSection(SolutionProperties) = preSolution\r
\t\tHideSolutionNode = FALSE\r
\tEndGlobalSection\r
\tGlobalSection(NestedProjects) = preSolution\r
\t\t{1C2D3E4F-5A6B-4C7D-8E9F-0A1B2C3D4E5F} = {5E6F7A8B-9C0D-4E1F-A2B3-C4D5E6F7A8B9}\r
\tEndGlobalSection\r
\tGlobalSection(ExtensibilityGlobals) = postSolution\r
\t\tSolutionGuid = {6F7A8B9C-0D1E-4F2A-B3C4-D5E6F7A8B9C0}\r
\tEndGlobalSection\r
EndGlobal\r
";

fn design_id() -> Uuid {
    Uuid::parse_str("1C2D3E4F-5A6B-4C7D-8E9F-0A1B2C3D4E5F").unwrap()
}

#[test]
fn parse_reads_projects_and_folders() {
    let solution = Solution::parse(SAMPLE).unwrap();

    let paths: Vec<_> = solution.projects().map(|p| p.path.as_str()).collect();
    assert_eq!(
        paths,
        vec![
            "src/Bonsai.Widgets/Bonsai.Widgets.csproj",
            "src/Bonsai.Widgets.Design/Bonsai.Widgets.Design.csproj",
        ]
    );

    let folder = solution.folders().next().unwrap();
    assert_eq!(solution.folder_path(folder.id).unwrap(), "/build/");
    assert_eq!(folder.files(), ["build/Common.props", "build/Package.props"]);
}

#[test]
fn parse_applies_nesting_and_types() {
    let solution = Solution::parse(SAMPLE).unwrap();
    let design = solution.project(design_id()).unwrap();

    assert_eq!(design.type_id, types::CSHARP_LEGACY);
    assert_eq!(
        design.parent,
        solution.find_folder("/build/"),
        "design project is nested under /build/"
    );
}

#[test]
fn parse_detects_bom_and_line_endings() {
    let solution = Solution::parse(SAMPLE).unwrap();
    assert_eq!(solution.line_ending(), LineEnding::CrLf);
    assert_eq!(solution.configurations().len(), 2);
    assert_eq!(solution.mappings().len(), 4);
}

#[test]
fn unedited_solution_is_written_back_verbatim() {
    let solution = Solution::parse(SAMPLE).unwrap();
    assert_eq!(solution.to_string(), SAMPLE);
}

#[test]
fn lf_solutions_without_bom_stay_that_way() {
    let text = SAMPLE.trim_start_matches('\u{feff}').replace("\r\n", "\n");
    let solution = Solution::parse(&text).unwrap();

    assert_eq!(solution.line_ending(), LineEnding::Lf);
    assert_eq!(solution.to_string(), text);
}

#[test]
fn edits_survive_a_round_trip() {
    let mut solution = Solution::parse(SAMPLE).unwrap();

    solution.move_to_folder(design_id(), None);
    solution.project_mut(design_id()).unwrap().type_id = types::CSHARP;
    let added = solution.add_project("tests/Bonsai.Widgets.Tests/Bonsai.Widgets.Tests.csproj").unwrap();
    let folder = solution.add_folder("/build/targets/").unwrap();
    solution.folder_mut(folder).unwrap().add_file("build/targets/Extra.targets");

    let text = solution.to_string();
    assert!(text.contains("tests\\Bonsai.Widgets.Tests\\Bonsai.Widgets.Tests.csproj"));
    assert!(text.contains("\t\tbuild\\targets\\Extra.targets = build\\targets\\Extra.targets\r\n"));

    let reparsed = Solution::parse(&text).unwrap();
    assert_eq!(reparsed.project(design_id()).unwrap().parent, None);
    assert_eq!(reparsed.project(design_id()).unwrap().type_id, types::CSHARP);
    assert!(reparsed.project(added).is_some());
    assert_eq!(
        reparsed.folder_path(folder).as_deref(),
        Some("/build/targets/")
    );
    assert_eq!(reparsed.mappings().len(), 8);
}

#[test]
fn nested_projects_section_disappears_when_empty() {
    let mut solution = Solution::parse(SAMPLE).unwrap();
    solution.move_to_folder(design_id(), None);

    assert!(!solution.to_string().contains("NestedProjects"));
}

#[test]
fn removing_mixed_platforms_rewrites_configurations() {
    let text = SAMPLE.replace(
        "\t\tRelease|Any CPU = Release|Any CPU\r\n",
        "\t\tRelease|Any CPU = Release|Any CPU\r\n\t\tDebug|Mixed Platforms = Debug|Mixed Platforms\r\n",
    );
    let mut solution = Solution::parse(&text).unwrap();

    assert!(solution.remove_platform("Mixed Platforms"));
    assert_eq!(solution.to_string(), SAMPLE);
}

#[test]
fn save_and_load_through_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Bonsai.Widgets.sln");

    let mut solution = Solution::new();
    solution.add_project("src/Bonsai.Widgets/Bonsai.Widgets.csproj").unwrap();
    solution.save(&path).unwrap();

    let loaded = Solution::load(&path).unwrap();
    assert_eq!(loaded, solution);
}

#[test]
fn unterminated_project_is_malformed() {
    let text = "Project(\"{FAE04EC0-301F-11D3-BF4B-00C04F79EFBC}\") = \"A\", \"A.csproj\", \"{0B4D2C3E-1A5F-4E6B-9C7D-8E9F0A1B2C3D}\"\n";
    let err = Solution::parse(text).unwrap_err();
    assert!(matches!(err, Error::Malformed { line: 1, .. }));
}

#[test]
fn unterminated_global_is_malformed() {
    let err = Solution::parse("Global\n\tGlobalSection(SolutionProperties) = preSolution\n").unwrap_err();
    assert!(matches!(err, Error::Malformed { .. }));
}
