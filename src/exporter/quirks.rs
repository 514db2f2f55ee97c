//! Settings specific to one target kind.
//!
//! Each kind maps to one function computing the extra defines, search
//! paths, linker settings and build steps its project document needs for a
//! given configuration. Kinds without special needs map to [`no_extras`].

use crate::core::config::{Architecture, BuildConfiguration};
use crate::core::defines::Defines;
use crate::core::target::{Target, TargetKind};
use crate::exporter::context::ExportContext;
use crate::exporter::error::ExportError;
use crate::exporter::paths::{self, out_dir_file};

/// Kind-specific additions to a target's per-configuration settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtraSettings {
    pub defines: Defines,
    pub header_paths: Vec<String>,
    pub linker_flags: String,
    pub delay_load_dlls: Vec<String>,
    /// Used only when the configuration does not name a module definition file
    pub module_definition_file: Option<String>,
    pub prebuild: String,
    pub postbuild: String,
}

type QuirkFn = fn(&ExportContext<'_>, &Target, &BuildConfiguration) -> Result<ExtraSettings, ExportError>;

/// SDK folders searched by RTAS builds, relative to the RTAS SDK.
const RTAS_SEARCH_PATHS: [&str; 26] = [
    "AlturaPorts/TDMPlugins/PluginLibrary/EffectClasses",
    "AlturaPorts/TDMPlugins/PluginLibrary/ProcessClasses",
    "AlturaPorts/TDMPlugins/PluginLibrary/ProcessClasses/Interfaces",
    "AlturaPorts/TDMPlugins/PluginLibrary/Utilities",
    "AlturaPorts/TDMPlugins/PluginLibrary/RTASP_Adapt",
    "AlturaPorts/TDMPlugins/PluginLibrary/CoreClasses",
    "AlturaPorts/TDMPlugins/PluginLibrary/Controls",
    "AlturaPorts/TDMPlugins/PluginLibrary/Meters",
    "AlturaPorts/TDMPlugins/PluginLibrary/ViewClasses",
    "AlturaPorts/TDMPlugins/PluginLibrary/DSPClasses",
    "AlturaPorts/TDMPlugins/PluginLibrary/Interfaces",
    "AlturaPorts/TDMPlugins/common",
    "AlturaPorts/TDMPlugins/common/Platform",
    "AlturaPorts/TDMPlugins/common/Macros",
    "AlturaPorts/TDMPlugins/SignalProcessing/Public",
    "AlturaPorts/TDMPlugIns/DSPManager/Interfaces",
    "AlturaPorts/SADriver/Interfaces",
    "AlturaPorts/DigiPublic/Interfaces",
    "AlturaPorts/DigiPublic",
    "AlturaPorts/Fic/Interfaces/DAEClient",
    "AlturaPorts/NewFileLibs/Cmn",
    "AlturaPorts/NewFileLibs/DOA",
    "AlturaPorts/AlturaSource/PPC_H",
    "AlturaPorts/AlturaSource/AppSupport",
    "AvidCode/AVX2sdk/AVX/avx2/avx2sdk/inc",
    "xplat/AVX/avx2/avx2sdk/inc",
];

/// SDK libraries an RTAS plugin loads lazily.
const RTAS_DELAY_LOAD_DLLS: [&str; 7] = [
    "DAE.dll",
    "DigiExt.dll",
    "DSI.dll",
    "PluginLib.dll",
    "DSPManager.dll",
    "DSPManagerClientLib.dll",
    "RTASClientLib.dll",
];

fn quirks_for(kind: TargetKind) -> QuirkFn {
    match kind {
        TargetKind::SharedCode => shared_code,
        TargetKind::Vst | TargetKind::Vst3 | TargetKind::Standalone => plugin_wrapper,
        TargetKind::Aax => aax,
        TargetKind::Rtas => rtas,
        TargetKind::GuiApp | TargetKind::ConsoleApp => no_extras,
        TargetKind::StaticLibrary | TargetKind::DynamicLibrary => library,
    }
}

/// The extra settings of `target` for `config`.
pub fn extra_settings(
    ctx: &ExportContext<'_>,
    target: &Target,
    config: &BuildConfiguration,
) -> Result<ExtraSettings, ExportError> {
    quirks_for(target.kind)(ctx, target, config)
}

fn no_extras(_: &ExportContext<'_>, _: &Target, _: &BuildConfiguration) -> Result<ExtraSettings, ExportError> {
    Ok(ExtraSettings::default())
}

fn library(_: &ExportContext<'_>, _: &Target, _: &BuildConfiguration) -> Result<ExtraSettings, ExportError> {
    Ok(ExtraSettings {
        defines: Defines::new().with("_LIB", ""),
        ..ExtraSettings::default()
    })
}

/// The shared code is compiled once for every wrapper format in the graph.
fn shared_code(ctx: &ExportContext<'_>, _: &Target, _: &BuildConfiguration) -> Result<ExtraSettings, ExportError> {
    let mut defines = Defines::new().with("SHARED_CODE", "1");

    for wrapper in ctx.graph.targets() {
        if let Some(token) = wrapper.kind.build_flag_token() {
            defines.set(format!("PLUGIN_BUILD_{}", token), "1");
        }
    }
    defines.set("_LIB", "");

    Ok(ExtraSettings {
        defines,
        ..ExtraSettings::default()
    })
}

fn wrapper_defines(target: &Target) -> Defines {
    let mut defines = Defines::new();
    if let Some(token) = target.kind.build_flag_token() {
        defines.set(format!("PLUGIN_BUILD_{}", token), "1");
    }
    defines
}

fn plugin_wrapper(
    ctx: &ExportContext<'_>,
    target: &Target,
    config: &BuildConfiguration,
) -> Result<ExtraSettings, ExportError> {
    let vst3_sdk = ctx.project.exporter.vst3_sdk.trim();

    let header_paths = if target.kind == TargetKind::Vst3 && !vst3_sdk.is_empty() {
        vec![ctx.rebase_for(target, vst3_sdk)?]
    } else {
        Vec::new()
    };

    Ok(ExtraSettings {
        defines: wrapper_defines(target),
        header_paths,
        postbuild: copy_step(target, config).unwrap_or_default(),
        ..ExtraSettings::default()
    })
}

/// `copy /Y` into the install folder, when the configuration enables it.
fn copy_step(target: &Target, config: &BuildConfiguration) -> Option<String> {
    if !config.plugin_copy_step {
        return None;
    }

    let location = match target.kind {
        TargetKind::Vst => &config.install_locations.vst,
        TargetKind::Vst3 => &config.install_locations.vst3,
        TargetKind::Rtas => &config.install_locations.rtas,
        _ => return None,
    };

    Some(format!(
        "copy /Y \"$(OutDir)$(TargetFileName)\" \"{}\\$(TargetFileName)\"",
        location
    ))
}

fn rtas(ctx: &ExportContext<'_>, target: &Target, config: &BuildConfiguration) -> Result<ExtraSettings, ExportError> {
    let sdk = &ctx.project.exporter.rtas_sdk;

    let mut defines = wrapper_defines(target);
    defines.set(
        "PLUGIN_RTAS_WINBAG_PATH",
        ctx.rebase_quoted_for(target, &paths::join(sdk, "WinBag"))?,
    );

    let header_paths = RTAS_SEARCH_PATHS
        .iter()
        .map(|p| ctx.rebase_quoted_for(target, &paths::join(sdk, p)))
        .collect::<Result<Vec<_>, _>>()?;

    let def_file = paths::join(&ctx.project.exporter.plugin_client_dir, "RTAS/RTAS_WinExports.def");
    let module_definition_file = ctx
        .rebaser
        .rebase_with_dot(&def_file)
        .ok_or_else(|| ExportError::path_resolution(target.name.clone(), def_file.clone(), "module definition file cannot be rebased"))?;

    Ok(ExtraSettings {
        defines,
        header_paths,
        linker_flags: "/FORCE:multiple".to_string(),
        delay_load_dlls: RTAS_DELAY_LOAD_DLLS.iter().map(|s| s.to_string()).collect(),
        module_definition_file: Some(module_definition_file),
        postbuild: copy_step(target, config).unwrap_or_default(),
        ..ExtraSettings::default()
    })
}

fn aax(ctx: &ExportContext<'_>, target: &Target, config: &BuildConfiguration) -> Result<ExtraSettings, ExportError> {
    let sdk = &ctx.project.exporter.aax_sdk;
    let tokens = ctx.user_defines(config);

    let mut defines = wrapper_defines(target);
    defines.set(
        "PLUGIN_AAX_LIBS_PATH",
        ctx.rebase_quoted_for(target, &paths::join(sdk, "Libs"))?,
    );

    let arch_dir_name = match config.architecture {
        Architecture::X64 => "x64",
        Architecture::Win32 => "Win32",
    };

    let prebuild = {
        let bundle_dir = out_dir_file(&tokens, &config.output_filename(".aaxplugin", false));
        let contents = format!("{}\\Contents", bundle_dir);
        let arch_dir = format!("{}\\{}", contents, arch_dir_name);

        [bundle_dir, contents, arch_dir]
            .iter()
            .map(|folder| format!("if not exist \"{0}\" mkdir \"{0}\"\r\n", folder))
            .collect::<String>()
    };

    let postbuild = {
        let bundle_name = config.output_filename(".aaxplugin", true);
        let bundle_dir = out_dir_file(&tokens, &bundle_name);
        let arch_dir = format!("{}\\Contents\\{}", bundle_dir, arch_dir_name);
        let executable = format!("{}\\{}", arch_dir, bundle_name);
        let output = out_dir_file(&tokens, &config.output_filename(target.suffix(), true));

        let script = ctx.rebase_quoted_for(target, &paths::join(sdk, "Utilities/CreatePackage.bat"))?;
        let icon = match &ctx.icon_file {
            Some(icon) => format!("\"{}\"", paths::c_escape(icon)),
            None => ctx.rebase_quoted_for(target, &paths::join(sdk, "Utilities/PlugIn.ico"))?,
        };

        let mut steps = format!(
            "copy /Y \"{}\" \"{}\"\r\ncall {} \"{}\" {}",
            output, executable, script, arch_dir, icon
        );

        if config.plugin_copy_step {
            steps.push_str(&format!(
                "\r\nxcopy \"{}\" \"{}\\{}\\\" /E /Y /H /K",
                bundle_dir, config.install_locations.aax, bundle_name
            ));
        }

        steps
    };

    Ok(ExtraSettings {
        defines,
        prebuild,
        postbuild,
        ..ExtraSettings::default()
    })
}
