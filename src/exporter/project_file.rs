//! The `.vcxproj` document of one target.

use crate::core::config::BuildConfiguration;
use crate::core::defines::Defines;
use crate::core::target::{Target, TargetFileType, TargetKind};
use crate::exporter::context::ExportContext;
use crate::exporter::error::ExportError;
use crate::exporter::paths::{int_dir_file, out_dir_file, prepend_dot};
use crate::exporter::quirks::{self, ExtraSettings};
use crate::exporter::routing::{FileRole, RoutedFiles};
use crate::exporter::xml::XmlElement;

pub const MSBUILD_NAMESPACE: &str = "http://schemas.microsoft.com/developer/msbuild/2003";

/// `Condition` attribute value selecting `config`.
pub fn config_condition(config: &BuildConfiguration) -> String {
    format!(
        "'$(Configuration)|$(Platform)'=='{}'",
        config.canonical_name()
    )
}

/// Build the project document of `target` listing `files`.
pub fn project_document(
    ctx: &ExportContext<'_>,
    target: &Target,
    files: &RoutedFiles,
) -> Result<XmlElement, ExportError> {
    let mut root = XmlElement::new("Project");
    root.set_attribute("DefaultTargets", "Build")
        .set_attribute("ToolsVersion", ctx.profile.tools_version)
        .set_attribute("xmlns", MSBUILD_NAMESPACE);

    {
        let configs = root.add_child("ItemGroup");
        configs.set_attribute("Label", "ProjectConfigurations");

        for config in ctx.project.configurations() {
            configs
                .add_child("ProjectConfiguration")
                .set_attribute("Include", config.canonical_name())
                .add_text_child("Configuration", config.name.as_str())
                .add_text_child("Platform", config.architecture.as_str());
        }
    }

    root.add_child("PropertyGroup")
        .set_attribute("Label", "Globals")
        .add_text_child("ProjectGuid", target.guid.as_str());

    root.add_child("Import")
        .set_attribute("Project", "$(VCTargetsPath)\\Microsoft.Cpp.Default.props");

    for config in ctx.project.configurations() {
        add_configuration_properties(ctx, target, config, &mut root);
    }

    root.add_child("Import")
        .set_attribute("Project", "$(VCTargetsPath)\\Microsoft.Cpp.props");
    root.add_child("ImportGroup").set_attribute("Label", "ExtensionSettings");

    root.add_child("ImportGroup")
        .set_attribute("Label", "PropertySheets")
        .add_child("Import")
        .set_attribute("Project", "$(UserRootDir)\\Microsoft.Cpp.$(Platform).user.props")
        .set_attribute(
            "Condition",
            "exists('$(UserRootDir)\\Microsoft.Cpp.$(Platform).user.props')",
        )
        .set_attribute("Label", "LocalAppDataPlatform");

    root.add_child("PropertyGroup").set_attribute("Label", "UserMacros");

    add_output_properties(ctx, target, &mut root)?;

    for config in ctx.project.configurations() {
        let extras = quirks::extra_settings(ctx, target, config)?;
        root.push(item_definitions(ctx, target, config, &extras)?);
    }

    add_file_lists(ctx, files, &mut root);

    root.add_child("Import")
        .set_attribute("Project", "$(VCTargetsPath)\\Microsoft.Cpp.targets");
    root.add_child("ImportGroup").set_attribute("Label", "ExtensionTargets");

    add_toolchain_properties(ctx, &mut root);

    Ok(root)
}

fn add_configuration_properties(
    ctx: &ExportContext<'_>,
    target: &Target,
    config: &BuildConfiguration,
    root: &mut XmlElement,
) {
    let group = root.add_child("PropertyGroup");
    group
        .set_attribute("Condition", config_condition(config))
        .set_attribute("Label", "Configuration")
        .add_text_child("ConfigurationType", target.file_type().configuration_type())
        .add_text_child("UseOfMfc", "false")
        .add_text_child("WholeProgramOptimization", bool_text(config.link_time_optimisation));

    if let Some(charset) = config.character_set {
        group.add_text_child("CharacterSet", charset.as_str());
    }
    if config.incremental_linking {
        group.add_text_child("LinkIncremental", "true");
    }
    if config.is_64_bit() {
        group.add_text_child("PlatformToolset", ctx.toolset.as_str());
    }
}

fn add_output_properties(
    ctx: &ExportContext<'_>,
    target: &Target,
    root: &mut XmlElement,
) -> Result<(), ExportError> {
    let props = root.add_child("PropertyGroup");
    props
        .add_text_child("_ProjectFileVersion", "10.0.30319.1")
        .add_text_child("TargetExt", target.suffix());

    for config in ctx.project.configurations() {
        let condition = config_condition(config);

        props
            .add_child("OutDir")
            .set_attribute("Condition", condition.as_str())
            .add_text(format!("{}\\", ctx.config_target_path(target, config)?));

        props
            .add_child("IntDir")
            .set_attribute("Condition", condition.as_str())
            .add_text(intermediates_path(target, config));

        props
            .add_child("TargetName")
            .set_attribute("Condition", condition.as_str())
            .add_text(config.output_filename("", false));

        props
            .add_child("GenerateManifest")
            .set_attribute("Condition", condition.as_str())
            .add_text(bool_text(config.generate_manifest));

        let library_paths = library_search_paths(ctx, target, config)?;
        if !library_paths.is_empty() {
            props
                .add_child("LibraryPath")
                .set_attribute("Condition", condition.as_str())
                .add_text(format!("$(LibraryPath);{}", library_paths.join(";")));
        }
    }

    Ok(())
}

/// `<intermediates>\<target>\`, defaulting to `$(Platform)\$(Configuration)`.
fn intermediates_path(target: &Target, config: &BuildConfiguration) -> String {
    let mut path = match config.intermediates_path.trim() {
        "" => "$(Platform)\\$(Configuration)".to_string(),
        custom => custom.replace('/', "\\"),
    };
    if !path.ends_with('\\') {
        path.push('\\');
    }
    format!("{}{}\\", path, target.name)
}

/// Configuration library folders, plus the shared-code output folder for wrappers.
fn library_search_paths(
    ctx: &ExportContext<'_>,
    target: &Target,
    config: &BuildConfiguration,
) -> Result<Vec<String>, ExportError> {
    let mut paths = rebased_paths(ctx, target, &config.library_paths)?;

    if let Some(shared) = ctx.graph.shared_dependency(target) {
        paths.push(ctx.config_target_path(shared, config)?);
    }

    Ok(paths)
}

/// Trim, drop empties and duplicates, then rebase.
fn rebased_paths(
    ctx: &ExportContext<'_>,
    target: &Target,
    paths: &[String],
) -> Result<Vec<String>, ExportError> {
    let mut cleaned: Vec<&str> = Vec::new();
    for path in paths.iter().map(|p| p.trim()).filter(|p| !p.is_empty()) {
        if !cleaned.contains(&path) {
            cleaned.push(path);
        }
    }

    cleaned
        .into_iter()
        .map(|p| ctx.rebase_for(target, p))
        .collect()
}

/// Every preprocessor define of `target` in `config`.
///
/// Later sources replace earlier ones: exporter defaults, module defines,
/// the kind's own defines, project defines, configuration defines.
pub fn preprocessor_defines(
    ctx: &ExportContext<'_>,
    target: &Target,
    config: &BuildConfiguration,
    extras: &ExtraSettings,
) -> Defines {
    let mut defines = Defines::new().with("_CRT_SECURE_NO_WARNINGS", "");

    if target.kind == TargetKind::ConsoleApp {
        defines.set("_CONSOLE", "");
    }
    defines.set("WIN32", "");
    defines.set("_WINDOWS", "");

    if config.is_debug {
        defines.set("DEBUG", "");
        defines.set("_DEBUG", "");
    } else {
        defines.set("NDEBUG", "");
    }

    defines
        .merged(&ctx.project.module_defines)
        .merged(&extras.defines)
        .merged(&ctx.project.defines)
        .merged(&config.defines)
}

fn item_definitions(
    ctx: &ExportContext<'_>,
    target: &Target,
    config: &BuildConfiguration,
    extras: &ExtraSettings,
) -> Result<XmlElement, ExportError> {
    let tokens = ctx.user_defines(config);
    let debug_define = if config.is_debug { "_DEBUG" } else { "NDEBUG" };

    let mut group = XmlElement::new("ItemDefinitionGroup");
    group.set_attribute("Condition", config_condition(config));

    {
        let midl = group.add_child("Midl");
        midl.add_text_child(
            "PreprocessorDefinitions",
            format!("{};%(PreprocessorDefinitions)", debug_define),
        )
        .add_text_child("MkTypLibCompatible", "true")
        .add_text_child("SuppressStartupBanner", "true")
        .add_text_child("TargetEnvironment", "Win32");
        midl.add_child("HeaderFileName");
    }

    {
        let header_paths = {
            let mut all = ctx.project.header_search_paths();
            all.extend(config.header_paths.iter().cloned());
            all
        };
        let mut include_dirs = rebased_paths(ctx, target, &header_paths)?;
        include_dirs.extend(extras.header_paths.iter().cloned());
        include_dirs.push("%(AdditionalIncludeDirectories)".to_string());

        let defines = preprocessor_defines(ctx, target, config, extras);

        let cl = group.add_child("ClCompile");
        cl.add_text_child("Optimization", config.optimisation.msvc_token());

        if config.generates_debug_symbols() {
            cl.add_text_child(
                "DebugInformationFormat",
                config.debug_information_format.msvc_token(),
            );
        }

        cl.add_text_child("AdditionalIncludeDirectories", include_dirs.join(";"))
            .add_text_child(
                "PreprocessorDefinitions",
                format!("{};%(PreprocessorDefinitions)", defines.join(";")),
            )
            .add_text_child(
                "RuntimeLibrary",
                ctx.runtime_for(config).msvc_token(config.is_debug),
            )
            .add_text_child("RuntimeTypeInfo", "true");
        cl.add_child("PrecompiledHeader");
        cl.add_text_child("AssemblerListingLocation", "$(IntDir)\\")
            .add_text_child("ObjectFileName", "$(IntDir)\\")
            .add_text_child("ProgramDataBaseFileName", "$(IntDir)\\")
            .add_text_child("WarningLevel", config.warning_level.msvc_token())
            .add_text_child("SuppressStartupBanner", "true")
            .add_text_child("MultiProcessorCompilation", "true");

        if config.fast_math {
            cl.add_text_child("FloatingPointModel", "Fast");
        }

        let compiler_flags = tokens
            .replace_tokens(&ctx.project.exporter.extra_compiler_flags)
            .trim()
            .to_string();
        if !compiler_flags.is_empty() {
            cl.add_text_child(
                "AdditionalOptions",
                format!("{} %(AdditionalOptions)", compiler_flags),
            );
        }

        if config.warnings_as_errors {
            cl.add_text_child("TreatWarningAsError", "true");
        }

        cl.add_text_child("LanguageStandard", ctx.project.cpp_standard.msvc_token());
    }

    group.add_child("ResourceCompile").add_text_child(
        "PreprocessorDefinitions",
        format!("{};%(PreprocessorDefinitions)", debug_define),
    );

    let dependencies = additional_dependencies(ctx, target, config, &tokens);
    let library_dirs = {
        let dirs = rebased_paths(ctx, target, &config.library_paths)?;
        if dirs.is_empty() {
            String::new()
        } else {
            format!(
                "{};%(AdditionalLibraryDirectories)",
                tokens.replace_tokens(&dirs.join(";"))
            )
        }
    };

    {
        let link = group.add_child("Link");
        link.add_text_child(
            "OutputFile",
            out_dir_file(&tokens, &config.output_filename(target.suffix(), true)),
        )
        .add_text_child("SuppressStartupBanner", "true")
        .add_text_child(
            "IgnoreSpecificDefaultLibraries",
            if config.is_debug {
                "libcmt.lib; msvcrt.lib;;%(IgnoreSpecificDefaultLibraries)"
            } else {
                "%(IgnoreSpecificDefaultLibraries)"
            },
        )
        .add_text_child("GenerateDebugInformation", bool_text(config.generates_debug_symbols()))
        .add_text_child(
            "ProgramDatabaseFile",
            int_dir_file(&tokens, &config.output_filename(".pdb", true)),
        )
        .add_text_child(
            "SubSystem",
            if target.kind == TargetKind::ConsoleApp {
                "Console"
            } else {
                "Windows"
            },
        );

        if !config.is_64_bit() {
            link.add_text_child("TargetMachine", "MachineX86");
        }

        if !config.is_debug {
            link.add_text_child("OptimizeReferences", "true")
                .add_text_child("EnableCOMDATFolding", "true");
        }

        if !library_dirs.is_empty() {
            link.add_text_child("AdditionalLibraryDirectories", library_dirs.as_str());
        }

        link.add_text_child("LargeAddressAware", "true");

        if !dependencies.is_empty() {
            link.add_text_child("AdditionalDependencies", dependencies.as_str());
        }

        let linker_flags = [
            tokens
                .replace_tokens(&ctx.project.exporter.extra_linker_flags)
                .trim()
                .to_string(),
            extras.linker_flags.clone(),
        ]
        .into_iter()
        .filter(|f| !f.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
        if !linker_flags.is_empty() {
            link.add_text_child(
                "AdditionalOptions",
                format!("{} %(AdditionalOptions)", linker_flags),
            );
        }

        let delay_loaded = ctx
            .project
            .exporter
            .delay_loaded_dlls
            .iter()
            .map(|d| d.trim())
            .filter(|d| !d.is_empty())
            .chain(extras.delay_load_dlls.iter().map(|d| d.as_str()))
            .collect::<Vec<_>>()
            .join(";");
        if !delay_loaded.is_empty() {
            link.add_text_child("DelayLoadDLLs", delay_loaded);
        }

        if let Some(def_file) = module_definition_file(ctx, target, config, extras)? {
            link.add_text_child("ModuleDefinitionFile", def_file);
        }
    }

    group
        .add_child("Bscmake")
        .add_text_child("SuppressStartupBanner", "true")
        .add_text_child(
            "OutputFile",
            int_dir_file(&tokens, &config.output_filename(".bsc", true)),
        );

    {
        let lib = group.add_child("Lib");
        if !dependencies.is_empty() {
            lib.add_text_child("AdditionalDependencies", dependencies.as_str());
        }
        if !library_dirs.is_empty() {
            lib.add_text_child("AdditionalLibraryDirectories", library_dirs.as_str());
        }
    }

    if let Some(manifest) = &ctx.project.exporter.manifest_file {
        group
            .add_child("Manifest")
            .add_text_child("AdditionalManifestFiles", ctx.rebase_for(target, manifest)?);
    }

    if target.file_type() == TargetFileType::StaticLibrary && !config.is_64_bit() {
        group
            .add_child("Lib")
            .add_text_child("TargetMachine", "MachineX86");
    }

    let prebuild = join_build_steps(&config.prebuild_command, &extras.prebuild);
    if !prebuild.is_empty() {
        group
            .add_child("PreBuildEvent")
            .add_text_child("Command", prebuild);
    }

    let postbuild = join_build_steps(&config.postbuild_command, &extras.postbuild);
    if !postbuild.is_empty() {
        group
            .add_child("PostBuildEvent")
            .add_text_child("Command", postbuild);
    }

    Ok(group)
}

/// Link-time libraries: external libraries, module libraries, then the
/// shared-code library when `target` depends on it.
fn additional_dependencies(
    ctx: &ExportContext<'_>,
    target: &Target,
    config: &BuildConfiguration,
    tokens: &Defines,
) -> String {
    let mut libraries: Vec<String> = ctx
        .project
        .exporter
        .external_libraries
        .iter()
        .map(|lib| tokens.replace_tokens(lib).trim().to_string())
        .filter(|lib| !lib.is_empty())
        .collect();

    for lib in &ctx.project.module_libs {
        let lib = lib.trim();
        if lib.is_empty() {
            continue;
        }
        if lib.to_ascii_lowercase().ends_with(".lib") {
            libraries.push(lib.to_string());
        } else {
            libraries.push(format!("{}.lib", lib));
        }
    }

    if ctx.graph.shared_dependency(target).is_some() {
        libraries.push(tokens.replace_tokens(&config.output_filename(".lib", true)));
    }

    if libraries.is_empty() {
        String::new()
    } else {
        format!("{};%(AdditionalDependencies)", libraries.join(";"))
    }
}

fn module_definition_file(
    ctx: &ExportContext<'_>,
    target: &Target,
    config: &BuildConfiguration,
    extras: &ExtraSettings,
) -> Result<Option<String>, ExportError> {
    let configured = config.module_definition_file.trim();

    if configured.is_empty() {
        return Ok(extras.module_definition_file.clone());
    }

    Ok(Some(prepend_dot(&ctx.rebase_for(target, configured)?)))
}

/// User build steps followed by the kind's own, one per line.
pub fn join_build_steps(user: &str, extra: &str) -> String {
    let separator = if !user.is_empty() && !extra.is_empty() {
        "\r\n"
    } else {
        ""
    };
    format!("{}{}{}", user, separator, extra)
}

fn add_file_lists(ctx: &ExportContext<'_>, files: &RoutedFiles, root: &mut XmlElement) {
    {
        let sources = root.add_child("ItemGroup");
        for file in files.compiled() {
            let entry = sources.add_child("ClCompile");
            entry.set_attribute("Include", file.include.as_str());

            if let FileRole::Compile {
                exclude_from_build,
                std_call,
            } = file.role
            {
                if std_call {
                    entry.add_text_child("CallingConvention", "StdCall");
                }
                if exclude_from_build {
                    entry.add_text_child("ExcludedFromBuild", "true");
                }
            }
        }
    }

    {
        let headers = root.add_child("ItemGroup");
        for file in files.headers() {
            headers
                .add_child("ClInclude")
                .set_attribute("Include", file.include.as_str());
        }
    }

    let mut others = XmlElement::new("ItemGroup");
    for file in files.others() {
        others
            .add_child("None")
            .set_attribute("Include", file.include.as_str());
    }
    if let Some(icon) = &ctx.icon_file {
        others.add_child("None").set_attribute("Include", prepend_dot(icon));
    }
    if others.has_children() {
        root.push(others);
    }

    if let Some(rc) = &ctx.rc_file {
        root.add_child("ItemGroup")
            .add_child("ResourceCompile")
            .set_attribute("Include", prepend_dot(rc));
    }
}

/// Toolset, SDK and IPP settings on every property group that lacks them.
fn add_toolchain_properties(ctx: &ExportContext<'_>, root: &mut XmlElement) {
    let ipp = ctx
        .project
        .exporter
        .ipp_library
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    for group in root.elements_named_mut("PropertyGroup") {
        if !group.has_child_named("PlatformToolset") {
            group.add_text_child("PlatformToolset", ctx.toolset.as_str());
        }
        if !group.has_child_named("WindowsTargetPlatformVersion") {
            group.add_text_child("WindowsTargetPlatformVersion", ctx.windows_sdk.as_str());
        }
        if let Some(ipp) = ipp {
            if !group.has_child_named("UseIntelIPP") {
                group.add_text_child("UseIntelIPP", ipp);
            }
        }
    }
}

fn bool_text(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::Architecture;
    use crate::core::project::{CppStandard, FileEntry, Project, ProjectGroup};
    use crate::core::target::OutputFormat;
    use crate::exporter::profile::ExporterVariant;
    use crate::exporter::routing::route_files;

    fn project(formats: &[OutputFormat]) -> Project {
        let mut project = Project::new("Synth", "/work/synth");
        project.formats = formats.to_vec();
        project.defines = Defines::new().with("APP_NAME", "Synth");
        project.module_defines = Defines::new().with("MODULE_AVAILABLE", "1");
        project.module_libs = vec!["winmm".to_string()];
        project.header_paths = vec!["modules".to_string(), " ".to_string(), "modules".to_string()];

        let mut release32 = BuildConfiguration::release("Synth");
        release32.architecture = Architecture::Win32;
        project.configurations = vec![BuildConfiguration::debug("Synth"), release32];

        project.groups = vec![ProjectGroup::new("Source")
            .with_file(FileEntry::new("Source/Main.cpp"))
            .with_file(FileEntry::new("Source/Main.h"))];
        project
    }

    fn render(project: &Project, kind: TargetKind) -> String {
        let ctx = ExportContext::new(project, ExporterVariant::Vs2017, None)
            .unwrap()
            .with_resources(true, true);
        let target = ctx.graph.targets().find(|t| t.kind == kind).unwrap().clone();
        let files = route_files(&ctx, &target).unwrap();
        project_document(&ctx, &target, &files).unwrap().to_document()
    }

    fn child_text<'a, 'input>(node: roxmltree::Node<'a, 'input>, name: &str) -> Option<&'a str> {
        node.children()
            .find(|n| n.has_tag_name(name))
            .and_then(|n| n.text())
    }

    #[test]
    fn test_configuration_sections() {
        let project = project(&[OutputFormat::App]);
        let doc = render(&project, TargetKind::GuiApp);
        let parsed = roxmltree::Document::parse(&doc).unwrap();

        let includes: Vec<_> = parsed
            .descendants()
            .filter(|n| n.has_tag_name("ProjectConfiguration"))
            .filter_map(|n| n.attribute("Include"))
            .collect();
        assert_eq!(includes, vec!["Debug|x64", "Release|Win32"]);

        let groups: Vec<_> = parsed
            .descendants()
            .filter(|n| n.has_tag_name("ItemDefinitionGroup"))
            .collect();
        assert_eq!(groups.len(), 2);
        assert_eq!(
            groups[0].attribute("Condition"),
            Some("'$(Configuration)|$(Platform)'=='Debug|x64'")
        );

        let link = groups[1].children().find(|n| n.has_tag_name("Link")).unwrap();
        assert_eq!(child_text(link, "TargetMachine"), Some("MachineX86"));
        assert_eq!(child_text(link, "OptimizeReferences"), Some("true"));
        assert_eq!(child_text(link, "OutputFile"), Some("$(OutDir)\\Synth.exe"));
        assert_eq!(
            child_text(link, "AdditionalDependencies"),
            Some("winmm.lib;%(AdditionalDependencies)")
        );
    }

    #[test]
    fn test_compiler_settings() {
        let mut project = project(&[OutputFormat::Console]);
        project.cpp_standard = CppStandard::Cpp11;
        project.exporter.extra_compiler_flags = " /bigobj /D${APP_NAME} ".to_string();
        let doc = render(&project, TargetKind::ConsoleApp);
        let parsed = roxmltree::Document::parse(&doc).unwrap();

        let cl = parsed
            .descendants()
            .find(|n| n.has_tag_name("ClCompile") && n.parent().is_some_and(|p| p.has_tag_name("ItemDefinitionGroup")))
            .unwrap();

        assert_eq!(child_text(cl, "Optimization"), Some("Disabled"));
        assert_eq!(child_text(cl, "DebugInformationFormat"), Some("ProgramDatabase"));
        assert_eq!(child_text(cl, "LanguageStandard"), Some("stdcpp14"));
        assert_eq!(child_text(cl, "RuntimeLibrary"), Some("MultiThreadedDebug"));
        assert_eq!(
            child_text(cl, "AdditionalIncludeDirectories"),
            Some("..\\..\\modules;%(AdditionalIncludeDirectories)")
        );
        assert_eq!(
            child_text(cl, "PreprocessorDefinitions"),
            Some("_CRT_SECURE_NO_WARNINGS;_CONSOLE;WIN32;_WINDOWS;DEBUG;_DEBUG;MODULE_AVAILABLE=1;APP_NAME=Synth;%(PreprocessorDefinitions)")
        );
        assert_eq!(
            child_text(cl, "AdditionalOptions"),
            Some("/bigobj /DSynth %(AdditionalOptions)")
        );

        let link = parsed.descendants().find(|n| n.has_tag_name("Link")).unwrap();
        assert_eq!(child_text(link, "SubSystem"), Some("Console"));
    }

    #[test]
    fn test_wrapper_links_shared_code() {
        let project = project(&[OutputFormat::Vst3, OutputFormat::Standalone]);
        let doc = render(&project, TargetKind::Vst3);
        let parsed = roxmltree::Document::parse(&doc).unwrap();

        let lib_path = parsed
            .descendants()
            .find(|n| n.has_tag_name("LibraryPath"))
            .and_then(|n| n.text())
            .unwrap();
        assert_eq!(
            lib_path,
            "$(LibraryPath);$(SolutionDir)$(Platform)\\$(Configuration)\\Shared Code"
        );

        let deps = parsed
            .descendants()
            .find(|n| n.has_tag_name("AdditionalDependencies"))
            .and_then(|n| n.text())
            .unwrap();
        assert_eq!(deps, "winmm.lib;Synth.lib;%(AdditionalDependencies)");

        let ext = parsed
            .descendants()
            .find(|n| n.has_tag_name("TargetExt"))
            .and_then(|n| n.text());
        assert_eq!(ext, Some(".vst3"));
    }

    #[test]
    fn test_file_lists_include_resources() {
        let project = project(&[OutputFormat::App]);
        let doc = render(&project, TargetKind::GuiApp);
        let parsed = roxmltree::Document::parse(&doc).unwrap();

        let include_of = |tag: &str| -> Vec<String> {
            parsed
                .descendants()
                .filter(|n| n.has_tag_name(tag) && n.attribute("Include").is_some())
                .filter_map(|n| n.attribute("Include").map(str::to_string))
                .collect()
        };

        assert_eq!(include_of("ClCompile"), vec!["..\\..\\Source\\Main.cpp"]);
        assert_eq!(include_of("ClInclude"), vec!["..\\..\\Source\\Main.h"]);
        assert_eq!(include_of("None"), vec![".\\icon.ico"]);
        assert_eq!(include_of("ResourceCompile"), vec![".\\resources.rc"]);
    }

    #[test]
    fn test_every_property_group_gets_toolchain() {
        let mut project = project(&[OutputFormat::App]);
        project.exporter.ipp_library = Some("Sequential".to_string());
        let doc = render(&project, TargetKind::GuiApp);
        let parsed = roxmltree::Document::parse(&doc).unwrap();

        for group in parsed.descendants().filter(|n| n.has_tag_name("PropertyGroup")) {
            let toolsets = group
                .children()
                .filter(|n| n.has_tag_name("PlatformToolset"))
                .count();
            assert_eq!(toolsets, 1);
            assert_eq!(child_text(group, "PlatformToolset"), Some("v141"));
            assert_eq!(child_text(group, "WindowsTargetPlatformVersion"), Some("10.0.16299.0"));
            assert_eq!(child_text(group, "UseIntelIPP"), Some("Sequential"));
        }
    }

    #[test]
    fn test_define_merge_order() {
        let mut project = project(&[OutputFormat::StaticLibrary]);
        project.defines = Defines::new().with("_LIB", "user").with("WIN32", "override");
        let ctx = ExportContext::new(&project, ExporterVariant::Vs2017, None).unwrap();
        let target = ctx.graph.targets().next().unwrap().clone();
        let config = &project.configurations[1];
        let extras = quirks::extra_settings(&ctx, &target, config).unwrap();

        let defines = preprocessor_defines(&ctx, &target, config, &extras);
        assert_eq!(defines.get("WIN32"), Some("override"));
        assert_eq!(defines.get("_LIB"), Some("user"));
        assert_eq!(defines.get("NDEBUG"), Some(""));
        assert!(defines.get("_DEBUG").is_none());
    }

    #[test]
    fn test_join_build_steps() {
        assert_eq!(join_build_steps("", ""), "");
        assert_eq!(join_build_steps("echo a", ""), "echo a");
        assert_eq!(join_build_steps("", "copy x"), "copy x");
        assert_eq!(join_build_steps("echo a", "copy x"), "echo a\r\ncopy x");
    }

    #[test]
    fn test_intermediates_path() {
        let target = Target::new("synth", TargetKind::Vst3);
        let mut config = BuildConfiguration::debug("Synth");
        assert_eq!(
            intermediates_path(&target, &config),
            "$(Platform)\\$(Configuration)\\VST3\\"
        );

        config.intermediates_path = "obj/".to_string();
        assert_eq!(intermediates_path(&target, &config), "obj\\VST3\\");
    }
}
