//! POM metadata: the `<name>`, `<description>`, `<url>`, `<licenses>`,
//! `<developers>` and `<scm>` blocks Central requires, rendered from a
//! resolved config and parsed back.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use serde::Serialize;

use central_core::model::{
    is_blank, CentralPublisherConfig, DeveloperInfo, LicenseInfo, ProjectInfo,
};
use central_util::errors::CentralError;

const POM_NAMESPACE: &str = "http://maven.apache.org/POM/4.0.0";
const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";
const SCHEMA_LOCATION: &str =
    "http://maven.apache.org/POM/4.0.0 https://maven.apache.org/xsd/maven-4.0.0.xsd";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PomCoordinates {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
}

impl PomCoordinates {
    pub fn new(group_id: &str, artifact_id: &str, version: &str) -> Self {
        Self {
            group_id: group_id.to_string(),
            artifact_id: artifact_id.to_string(),
            version: version.to_string(),
        }
    }
}

/// A POM read back from XML.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PomDocument {
    pub coordinates: PomCoordinates,
    pub info: ProjectInfo,
}

/// Render a POM carrying the coordinates and the project metadata of
/// `config`. Blank fields are left out rather than written empty.
pub fn render_pom_metadata(
    config: &CentralPublisherConfig,
    coordinates: &PomCoordinates,
) -> miette::Result<String> {
    let info = &config.project_info;
    let mut pom = PomWriter::new();

    pom.event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    pom.event(Event::Start(BytesStart::new("project").with_attributes([
        ("xmlns", POM_NAMESPACE),
        ("xmlns:xsi", XSI_NAMESPACE),
        ("xsi:schemaLocation", SCHEMA_LOCATION),
    ])))?;
    pom.element("modelVersion", "4.0.0")?;
    pom.element("groupId", &coordinates.group_id)?;
    pom.element("artifactId", &coordinates.artifact_id)?;
    pom.element("version", &coordinates.version)?;
    pom.element("name", &info.name)?;
    pom.element("description", &info.description)?;
    pom.element("url", &info.url)?;

    if !is_blank(&info.license.name) {
        pom.open("licenses")?;
        pom.open("license")?;
        pom.element("name", &info.license.name)?;
        pom.element("url", &info.license.url)?;
        pom.element("distribution", &info.license.distribution)?;
        pom.element("comments", info.license.comments.as_deref().unwrap_or_default())?;
        pom.close("license")?;
        pom.close("licenses")?;
    }

    if !info.developers.is_empty() {
        pom.open("developers")?;
        for dev in &info.developers {
            pom.developer(dev)?;
        }
        pom.close("developers")?;
    }

    if !info.scm.is_blank() {
        pom.open("scm")?;
        pom.element("url", &info.scm.url)?;
        pom.element("connection", &info.scm.connection)?;
        pom.element("developerConnection", &info.scm.developer_connection)?;
        pom.close("scm")?;
    }

    pom.close("project")?;
    pom.finish()
}

struct PomWriter {
    writer: Writer<Vec<u8>>,
}

impl PomWriter {
    fn new() -> Self {
        Self {
            writer: Writer::new_with_indent(Vec::new(), b' ', 2),
        }
    }

    fn event(&mut self, event: Event<'_>) -> miette::Result<()> {
        self.writer.write_event(event).map_err(|e| {
            CentralError::Generic {
                message: format!("Failed to write POM XML: {e}"),
            }
            .into()
        })
    }

    fn open(&mut self, tag: &str) -> miette::Result<()> {
        self.event(Event::Start(BytesStart::new(tag)))
    }

    fn close(&mut self, tag: &str) -> miette::Result<()> {
        self.event(Event::End(BytesEnd::new(tag)))
    }

    /// `<tag>value</tag>`, skipped entirely when `value` is blank.
    fn element(&mut self, tag: &str, value: &str) -> miette::Result<()> {
        if is_blank(value) {
            return Ok(());
        }
        self.open(tag)?;
        self.event(Event::Text(BytesText::new(value.trim())))?;
        self.close(tag)
    }

    fn developer(&mut self, dev: &DeveloperInfo) -> miette::Result<()> {
        self.open("developer")?;
        self.element("id", &dev.id)?;
        self.element("name", &dev.name)?;
        self.element("email", &dev.email)?;
        self.element("organization", dev.organization.as_deref().unwrap_or_default())?;
        self.element(
            "organizationUrl",
            dev.organization_url.as_deref().unwrap_or_default(),
        )?;
        if !dev.roles.is_empty() {
            self.open("roles")?;
            for role in &dev.roles {
                self.element("role", role)?;
            }
            self.close("roles")?;
        }
        self.element("timezone", dev.timezone.as_deref().unwrap_or_default())?;
        self.close("developer")
    }

    fn finish(self) -> miette::Result<String> {
        let mut xml = String::from_utf8(self.writer.into_inner()).map_err(|e| {
            CentralError::Generic {
                message: format!("POM XML is not valid UTF-8: {e}"),
            }
        })?;
        xml.push('\n');
        Ok(xml)
    }
}

/// Read coordinates and project metadata back out of POM XML. Only the
/// first `<license>` is kept; unknown elements are ignored.
pub fn parse_pom_metadata(xml: &str) -> miette::Result<PomDocument> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut doc = PomDocument::default();
    let mut path: Vec<String> = Vec::new();
    let mut text_buf = String::new();

    let mut current_license: Option<LicenseInfo> = None;
    let mut current_dev: Option<DeveloperInfo> = None;
    let mut seen_license = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                let tag = String::from_utf8_lossy(e.name().as_ref()).to_string();
                path.push(tag);
                text_buf.clear();

                match path_context(&path).as_str() {
                    "project>licenses>license" if !seen_license => {
                        current_license = Some(LicenseInfo::default());
                    }
                    "project>developers>developer" => {
                        current_dev = Some(DeveloperInfo::default());
                    }
                    _ => {}
                }
            }
            Ok(Event::Text(ref e)) => {
                text_buf = e.unescape().unwrap_or_default().to_string();
            }
            Ok(Event::End(_)) => {
                let ctx = path_context(&path);
                let value = text_buf.clone();

                match ctx.as_str() {
                    "project>groupId" => doc.coordinates.group_id = value,
                    "project>artifactId" => doc.coordinates.artifact_id = value,
                    "project>version" => doc.coordinates.version = value,
                    "project>name" => doc.info.name = value,
                    "project>description" => doc.info.description = value,
                    "project>url" => doc.info.url = value,
                    "project>scm>url" => doc.info.scm.url = value,
                    "project>scm>connection" => doc.info.scm.connection = value,
                    "project>scm>developerConnection" => {
                        doc.info.scm.developer_connection = value;
                    }
                    "project>licenses>license" => {
                        if let Some(license) = current_license.take() {
                            doc.info.license = license;
                            seen_license = true;
                        }
                    }
                    "project>developers>developer" => {
                        if let Some(dev) = current_dev.take() {
                            doc.info.developers.push(dev);
                        }
                    }
                    _ => {}
                }

                if let Some(license) = current_license.as_mut() {
                    match ctx.as_str() {
                        "project>licenses>license>name" => license.name = text_buf.clone(),
                        "project>licenses>license>url" => license.url = text_buf.clone(),
                        "project>licenses>license>distribution" => {
                            license.distribution = text_buf.clone();
                        }
                        "project>licenses>license>comments" => {
                            license.comments = Some(text_buf.clone());
                        }
                        _ => {}
                    }
                }

                if let Some(dev) = current_dev.as_mut() {
                    if let Some(field) = ctx.strip_prefix("project>developers>developer>") {
                        match field {
                            "id" => dev.id = text_buf.clone(),
                            "name" => dev.name = text_buf.clone(),
                            "email" => dev.email = text_buf.clone(),
                            "organization" => dev.organization = Some(text_buf.clone()),
                            "organizationUrl" => dev.organization_url = Some(text_buf.clone()),
                            "timezone" => dev.timezone = Some(text_buf.clone()),
                            "roles>role" => dev.roles.push(text_buf.clone()),
                            _ => {}
                        }
                    }
                }

                path.pop();
                text_buf.clear();
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(CentralError::Generic {
                    message: format!("Failed to parse POM XML: {e}"),
                }
                .into());
            }
            _ => {}
        }
    }

    Ok(doc)
}

/// Build a context string from the current XML path for matching.
fn path_context(path: &[String]) -> String {
    path.join(">")
}
