//! Startup assets
//!
//! Every asset is fetched before the game loop starts. Any failure aborts
//! startup: there is no retry and no partial degradation.

use std::borrow::Cow;
use std::collections::HashMap;

use anyhow::{Context, Result, bail};
use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// Where each asset lives, relative to the page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetManifest {
    /// glTF backdrop model
    pub model: String,
    /// Texture applied to the lane pads
    pub pad_texture: String,
    /// Normal map applied to the platform and disks
    pub normal_map: String,
    /// Looping music track
    pub music: String,
}

impl Default for AssetManifest {
    fn default() -> Self {
        Self {
            model: "/backgroundPlatform.gltf".to_string(),
            pad_texture: "/interactivePlatformMap.jpg".to_string(),
            normal_map: "/brickNormalMap.jpeg".to_string(),
            music: "./music/dgforcemsc.mp3".to_string(),
        }
    }
}

/// An RGBA8 image ready for upload
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedTexture {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl DecodedTexture {
    /// Downscale, keeping aspect, so neither side exceeds `max_dim`
    pub fn fit_within(&self, max_dim: u32) -> Cow<'_, DecodedTexture> {
        let longest = self.width.max(self.height);
        if longest <= max_dim || max_dim == 0 {
            return Cow::Borrowed(self);
        }
        let Some(image) = image::RgbaImage::from_raw(self.width, self.height, self.rgba.clone())
        else {
            return Cow::Borrowed(self);
        };

        let scale = |side: u32| ((side as u64 * max_dim as u64) / longest as u64).max(1) as u32;
        let (width, height) = (scale(self.width), scale(self.height));
        log::info!(
            "Downscaling {}x{} texture to {}x{}",
            self.width,
            self.height,
            width,
            height
        );
        let resized = image::imageops::thumbnail(&image, width, height);
        Cow::Owned(DecodedTexture {
            width,
            height,
            rgba: resized.into_raw(),
        })
    }
}

/// Decode a JPEG/PNG into RGBA8
pub fn decode_texture(bytes: &[u8]) -> Result<DecodedTexture> {
    let image = image::load_from_memory(bytes).context("decoding image")?;
    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        bail!("image has no pixels");
    }
    Ok(DecodedTexture {
        width,
        height,
        rgba: rgba.into_raw(),
    })
}

/// Axis-aligned bounds of a model's vertex positions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelBounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl ModelBounds {
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Maps a unit cube centred at the origin onto these bounds
    pub fn fit_transform(&self) -> Mat4 {
        // Flat models still get a sliver of thickness
        let size = self.size().max(Vec3::splat(1e-3));
        Mat4::from_translation(self.center()) * Mat4::from_scale(size)
    }
}

// Just enough of the glTF 2.0 JSON schema to find position bounds.
#[derive(Deserialize)]
struct GltfDocument {
    asset: GltfAsset,
    #[serde(default)]
    meshes: Vec<GltfMesh>,
    #[serde(default)]
    accessors: Vec<GltfAccessor>,
}

#[derive(Deserialize)]
struct GltfAsset {
    version: String,
}

#[derive(Deserialize)]
struct GltfMesh {
    #[serde(default)]
    primitives: Vec<GltfPrimitive>,
}

#[derive(Deserialize)]
struct GltfPrimitive {
    #[serde(default)]
    attributes: HashMap<String, usize>,
}

#[derive(Deserialize)]
struct GltfAccessor {
    #[serde(default)]
    min: Option<Vec<f32>>,
    #[serde(default)]
    max: Option<Vec<f32>>,
}

/// Parse a glTF 2.0 document and return the bounds of all mesh positions
pub fn parse_model(bytes: &[u8]) -> Result<ModelBounds> {
    let doc: GltfDocument = serde_json::from_slice(bytes).context("parsing glTF JSON")?;

    if !doc.asset.version.starts_with('2') {
        bail!("unsupported glTF version {}", doc.asset.version);
    }

    let mut bounds: Option<ModelBounds> = None;
    for primitive in doc.meshes.iter().flat_map(|m| &m.primitives) {
        let Some(&index) = primitive.attributes.get("POSITION") else {
            continue;
        };
        let accessor = doc
            .accessors
            .get(index)
            .with_context(|| format!("POSITION accessor {} out of range", index))?;
        let (Some(min), Some(max)) = (&accessor.min, &accessor.max) else {
            bail!("POSITION accessor {} has no min/max", index);
        };
        if min.len() != 3 || max.len() != 3 {
            bail!("POSITION accessor {} is not 3-component", index);
        }

        let min = Vec3::new(min[0], min[1], min[2]);
        let max = Vec3::new(max[0], max[1], max[2]);
        bounds = Some(match bounds {
            Some(b) => ModelBounds {
                min: b.min.min(min),
                max: b.max.max(max),
            },
            None => ModelBounds { min, max },
        });
    }

    bounds.context("model has no mesh positions")
}

/// Everything fetched and decoded at startup
#[derive(Debug, Clone)]
pub struct LoadedAssets {
    pub model: ModelBounds,
    pub pad_texture: DecodedTexture,
    pub normal_map: DecodedTexture,
    /// Encoded audio; decoded by the audio backend
    pub music: Vec<u8>,
}

/// Fetch and decode every asset in the manifest (WASM only)
#[cfg(target_arch = "wasm32")]
pub async fn load_all(manifest: &AssetManifest) -> Result<LoadedAssets> {
    // Start every request before awaiting any of them
    let model_req = fetch::start(&manifest.model)?;
    let pad_req = fetch::start(&manifest.pad_texture)?;
    let normal_req = fetch::start(&manifest.normal_map)?;
    let music_req = fetch::start(&manifest.music)?;

    let model_bytes = fetch::bytes(&manifest.model, model_req).await?;
    let model =
        parse_model(&model_bytes).with_context(|| format!("loading {}", manifest.model))?;

    let pad_bytes = fetch::bytes(&manifest.pad_texture, pad_req).await?;
    let pad_texture =
        decode_texture(&pad_bytes).with_context(|| format!("loading {}", manifest.pad_texture))?;

    let normal_bytes = fetch::bytes(&manifest.normal_map, normal_req).await?;
    let normal_map =
        decode_texture(&normal_bytes).with_context(|| format!("loading {}", manifest.normal_map))?;

    let music = fetch::bytes(&manifest.music, music_req).await?;

    log::info!(
        "Assets loaded: model {:?}, pad {}x{}, normal map {}x{}, music {} bytes",
        model.size(),
        pad_texture.width,
        pad_texture.height,
        normal_map.width,
        normal_map.height,
        music.len()
    );

    Ok(LoadedAssets {
        model,
        pad_texture,
        normal_map,
        music,
    })
}

#[cfg(target_arch = "wasm32")]
mod fetch {
    use anyhow::{Context, Result, anyhow, bail};
    use js_sys::{Promise, Uint8Array};
    use wasm_bindgen::{JsCast, JsValue};
    use wasm_bindgen_futures::JsFuture;
    use web_sys::Response;

    fn js_err(e: JsValue) -> anyhow::Error {
        anyhow!("{:?}", e)
    }

    /// Begin a request
    pub fn start(url: &str) -> Result<Promise> {
        let window = web_sys::window().context("no window")?;
        Ok(window.fetch_with_str(url))
    }

    /// Wait for a request started by [`start`] and collect its body
    pub async fn bytes(url: &str, request: Promise) -> Result<Vec<u8>> {
        let response: Response = JsFuture::from(request)
            .await
            .map_err(js_err)
            .with_context(|| format!("fetching {}", url))?
            .dyn_into()
            .map_err(js_err)?;

        if !response.ok() {
            bail!("fetching {}: HTTP {}", url, response.status());
        }

        let body = response.array_buffer().map_err(js_err)?;
        let buffer = JsFuture::from(body)
            .await
            .map_err(js_err)
            .with_context(|| format!("reading {}", url))?;
        Ok(Uint8Array::new(&buffer).to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL_GLTF: &str = r#"{
        "asset": { "version": "2.0" },
        "meshes": [
            { "primitives": [ { "attributes": { "POSITION": 0, "NORMAL": 1 } } ] },
            { "primitives": [ { "attributes": { "POSITION": 2 } } ] }
        ],
        "accessors": [
            { "min": [-1.0, 0.0, -2.0], "max": [1.0, 0.5, 2.0] },
            { },
            { "min": [0.0, -1.0, 0.0], "max": [3.0, 0.0, 1.0] }
        ]
    }"#;

    #[test]
    fn test_model_bounds_union() {
        let bounds = parse_model(MINIMAL_GLTF.as_bytes()).unwrap();
        assert_eq!(bounds.min, Vec3::new(-1.0, -1.0, -2.0));
        assert_eq!(bounds.max, Vec3::new(3.0, 0.5, 2.0));
        assert_eq!(bounds.center(), Vec3::new(1.0, -0.25, 0.0));
    }

    #[test]
    fn test_fit_transform_maps_unit_cube() {
        let bounds = parse_model(MINIMAL_GLTF.as_bytes()).unwrap();
        let m = bounds.fit_transform();
        assert!((m.transform_point3(Vec3::splat(-0.5)) - bounds.min).length() < 1e-5);
        assert!((m.transform_point3(Vec3::splat(0.5)) - bounds.max).length() < 1e-5);
    }

    #[test]
    fn test_model_errors() {
        assert!(parse_model(b"not json").is_err());
        assert!(parse_model(br#"{ "asset": { "version": "1.0" } }"#).is_err());
        // Valid document with nothing to draw
        assert!(parse_model(br#"{ "asset": { "version": "2.0" } }"#).is_err());
        let missing_bounds = r#"{
            "asset": { "version": "2.0" },
            "meshes": [ { "primitives": [ { "attributes": { "POSITION": 0 } } ] } ],
            "accessors": [ { } ]
        }"#;
        assert!(parse_model(missing_bounds.as_bytes()).is_err());
    }

    #[test]
    fn test_decode_png() {
        let image = image::RgbaImage::from_pixel(3, 2, image::Rgba([10, 20, 30, 255]));
        let mut png = std::io::Cursor::new(Vec::new());
        image.write_to(&mut png, image::ImageFormat::Png).unwrap();

        let texture = decode_texture(png.get_ref()).unwrap();
        assert_eq!((texture.width, texture.height), (3, 2));
        assert_eq!(texture.rgba.len(), 3 * 2 * 4);
        assert_eq!(&texture.rgba[..4], &[10, 20, 30, 255]);
    }

    #[test]
    fn test_fit_within() {
        let texture = DecodedTexture {
            width: 8,
            height: 4,
            rgba: vec![255; 8 * 4 * 4],
        };
        assert!(matches!(texture.fit_within(8), Cow::Borrowed(_)));

        let small = texture.fit_within(2);
        assert_eq!((small.width, small.height), (2, 1));
        assert_eq!(small.rgba.len(), 2 * 4);
    }

    #[test]
    fn test_decode_garbage_fails() {
        assert!(decode_texture(&[0, 1, 2, 3]).is_err());
    }
}
