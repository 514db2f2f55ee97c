//! The `.vcxproj.filters` document: the virtual folder tree Visual Studio
//! shows for a target's files.

use crate::exporter::context::ExportContext;
use crate::exporter::paths::prepend_dot;
use crate::exporter::project_file::MSBUILD_NAMESPACE;
use crate::exporter::routing::{FileRole, RoutedFile, RoutedFiles};
use crate::exporter::xml::XmlElement;
use crate::util::hash::guid_from_seed;

/// Folder the generated icon and resource script are shown under.
pub const GENERATED_CODE_FILTER: &str = "Generated Code";

const FILTER_GUID_SALT: &str = "_guidpathsaltxhsdf";

/// Build the filters document for the files routed to one target.
pub fn filters_document(ctx: &ExportContext<'_>, files: &RoutedFiles) -> XmlElement {
    let mut root = XmlElement::new("Project");
    root.set_attribute("ToolsVersion", ctx.profile.tools_version)
        .set_attribute("xmlns", MSBUILD_NAMESPACE);

    let generated = ctx.icon_file.is_some() || ctx.rc_file.is_some();

    {
        let folders = root.add_child("ItemGroup");
        for folder in &files.folders {
            add_folder(folders, folder);
        }
        if generated {
            add_folder(folders, GENERATED_CODE_FILTER);
        }
    }

    {
        let sources = root.add_child("ItemGroup");
        for file in files.compiled() {
            add_file(sources, file);
        }
    }

    {
        let headers = root.add_child("ItemGroup");
        for file in files.headers() {
            add_file(headers, file);
        }
    }

    let mut others = XmlElement::new("ItemGroup");
    for file in files.others() {
        add_file(&mut others, file);
    }
    if let Some(icon) = &ctx.icon_file {
        others
            .add_child("None")
            .set_attribute("Include", prepend_dot(icon))
            .add_text_child("Filter", GENERATED_CODE_FILTER);
    }
    if others.has_children() {
        root.push(others);
    }

    if let Some(rc) = &ctx.rc_file {
        root.add_child("ItemGroup")
            .add_child("ResourceCompile")
            .set_attribute("Include", prepend_dot(rc))
            .add_text_child("Filter", GENERATED_CODE_FILTER);
    }

    root
}

fn add_folder(parent: &mut XmlElement, path: &str) {
    parent
        .add_child("Filter")
        .set_attribute("Include", path)
        .add_text_child(
            "UniqueIdentifier",
            guid_from_seed(&format!("{}{}", path, FILTER_GUID_SALT)),
        );
}

fn add_file(parent: &mut XmlElement, file: &RoutedFile) {
    let tag = match file.role {
        FileRole::Compile { .. } => "ClCompile",
        FileRole::Header => "ClInclude",
        FileRole::Other => "None",
    };

    parent
        .add_child(tag)
        .set_attribute("Include", file.include.as_str())
        .add_text_child("Filter", file.filter.as_str());
}
