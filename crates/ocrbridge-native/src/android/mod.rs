// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Android text recognition via ML Kit and JNI.
//
// Requires the Android NDK and an app that bundles
// `com.google.mlkit:text-recognition`. Targets `aarch64-linux-android` or
// `armv7-linux-androideabi`.
//
// ## Architecture notes
//
// ML Kit's `TextRecognizer.process` returns a `Task`. `recognize` runs on a
// blocking worker thread, so it waits on the task with `Tasks.await`, which
// ML Kit forbids only on the main thread.
//
// Worker threads are attached to the JVM on demand. Threads attached from
// native code resolve classes through the system class loader, which cannot
// see app dependencies such as ML Kit, so app classes are loaded once through
// the Activity's class loader and kept as global references.
//
// ML Kit has no region-of-interest input; region filtering happens entirely
// after recognition.

#![cfg(target_os = "android")]

use jni::objects::{GlobalRef, JClass, JObject, JString, JValue};
use jni::{JNIEnv, JavaVM};

use ocrbridge_core::error::{OcrBridgeError, Result};
use ocrbridge_core::{BridgeConfig, NormalizedRect, NormalizedRegion, TextObservation};
use ocrbridge_vision::DecodedImage;

use crate::traits::TextRecognizer;

// ---------------------------------------------------------------------------
// JNI bootstrap helpers
// ---------------------------------------------------------------------------

const TEXT_RECOGNITION_CLASS: &str = "com.google.mlkit.vision.text.TextRecognition";
const LATIN_OPTIONS_CLASS: &str = "com.google.mlkit.vision.text.latin.TextRecognizerOptions";
const INPUT_IMAGE_CLASS: &str = "com.google.mlkit.vision.common.InputImage";
const TASKS_CLASS: &str = "com.google.android.gms.tasks.Tasks";

/// Convenience: map any `jni::errors::Error` into `EngineFailure`, pulling the
/// pending Java exception's message when there is one.
fn jni_err(env: &mut JNIEnv, context: &str, e: jni::errors::Error) -> OcrBridgeError {
    let detail = take_exception(env).unwrap_or_else(|| e.to_string());
    OcrBridgeError::EngineFailure(format!("{context}: {detail}"))
}

/// Clear a pending Java exception and return its `toString()`.
fn take_exception(env: &mut JNIEnv) -> Option<String> {
    if !env.exception_check().unwrap_or(false) {
        return None;
    }
    let throwable = env.exception_occurred().ok()?;
    env.exception_clear().ok()?;
    let message = env
        .call_method(&throwable, "toString", "()Ljava/lang/String;", &[])
        .and_then(|v| v.l())
        .ok()?;
    let message = JString::from(message);
    env.get_string(&message).ok().map(String::from)
}

/// Load an app class through the Activity's class loader.
fn load_class<'local>(
    env: &mut JNIEnv<'local>,
    class_loader: &JObject,
    dotted_name: &str,
) -> Result<JObject<'local>> {
    let name = env
        .new_string(dotted_name)
        .map_err(|e| jni_err(env, "new_string(class name)", e))?;
    env.call_method(
        class_loader,
        "loadClass",
        "(Ljava/lang/String;)Ljava/lang/Class;",
        &[JValue::Object(&name)],
    )
    .and_then(|v| v.l())
    .map_err(|e| jni_err(env, dotted_name, e))
}

/// Java arrays are indexed by `jint`; anything longer cannot be handed over.
fn jint_len(len: usize) -> Result<i32> {
    i32::try_from(len).map_err(|_| {
        OcrBridgeError::EngineFailure(format!("image of {len} bytes exceeds the JNI array limit"))
    })
}

fn global_ref(env: &mut JNIEnv, obj: &JObject, what: &str) -> Result<GlobalRef> {
    env.new_global_ref(obj).map_err(|e| jni_err(env, what, e))
}

// ---------------------------------------------------------------------------
// Recognizer
// ---------------------------------------------------------------------------

/// Handles created once at startup and shared by every scan.
struct MlKit {
    vm: JavaVM,
    /// `com.google.mlkit.vision.text.TextRecognizer` client.
    client: GlobalRef,
    input_image_class: GlobalRef,
    tasks_class: GlobalRef,
}

/// Android implementation of [`TextRecognizer`] on top of ML Kit.
pub struct MlKitRecognizer {
    inner: std::result::Result<MlKit, String>,
}

impl MlKitRecognizer {
    /// Create the ML Kit client.
    ///
    /// Failure is remembered and reported from every `recognize` call.
    pub fn new(_config: &BridgeConfig) -> Self {
        let inner = MlKit::connect().map_err(|err| {
            tracing::error!(error = %err, "Android: ML Kit client unavailable");
            match err {
                OcrBridgeError::EngineFailure(detail) => detail,
                other => other.to_string(),
            }
        });
        Self { inner }
    }
}

impl MlKit {
    fn connect() -> Result<Self> {
        let ctx = ndk_context::android_context();
        if ctx.context().is_null() {
            return Err(OcrBridgeError::EngineFailure(
                "Android context is null; native activity not initialised".into(),
            ));
        }
        // SAFETY: `ctx.vm()` returns the `JavaVM*` set by the NDK glue code and
        // stays valid for the lifetime of the process.
        let vm = unsafe { JavaVM::from_raw(ctx.vm().cast()) }.map_err(|e| {
            OcrBridgeError::EngineFailure(format!("failed to obtain JavaVM: {e}"))
        })?;

        let (client, input_image_class, tasks_class) = {
            let mut env = vm.attach_current_thread().map_err(|e| {
                OcrBridgeError::EngineFailure(format!("failed to attach JNI thread: {e}"))
            })?;
            // SAFETY: the NDK guarantees this is a valid global jobject for the
            // hosting Activity.
            let activity = unsafe { JObject::from_raw(ctx.context().cast()) };
            let class_loader = env
                .call_method(&activity, "getClassLoader", "()Ljava/lang/ClassLoader;", &[])
                .and_then(|v| v.l())
                .map_err(|e| jni_err(&mut env, "getClassLoader", e))?;

            let options_class = JClass::from(load_class(&mut env, &class_loader, LATIN_OPTIONS_CLASS)?);
            let options = env
                .get_static_field(
                    &options_class,
                    "DEFAULT_OPTIONS",
                    "Lcom/google/mlkit/vision/text/latin/TextRecognizerOptions;",
                )
                .and_then(|v| v.l())
                .map_err(|e| jni_err(&mut env, "TextRecognizerOptions.DEFAULT_OPTIONS", e))?;

            let recognition_class =
                JClass::from(load_class(&mut env, &class_loader, TEXT_RECOGNITION_CLASS)?);
            let client = env
                .call_static_method(
                    &recognition_class,
                    "getClient",
                    "(Lcom/google/mlkit/vision/text/TextRecognizerOptionsInterface;)Lcom/google/mlkit/vision/text/TextRecognizer;",
                    &[JValue::Object(&options)],
                )
                .and_then(|v| v.l())
                .map_err(|e| jni_err(&mut env, "TextRecognition.getClient", e))?;

            let input_image_class = load_class(&mut env, &class_loader, INPUT_IMAGE_CLASS)?;
            let tasks_class = load_class(&mut env, &class_loader, TASKS_CLASS)?;

            (
                global_ref(&mut env, &client, "global(client)")?,
                global_ref(&mut env, &input_image_class, "global(InputImage)")?,
                global_ref(&mut env, &tasks_class, "global(Tasks)")?,
            )
        };

        tracing::info!("Android: ML Kit text recognizer ready");
        Ok(Self {
            vm,
            client,
            input_image_class,
            tasks_class,
        })
    }

    fn recognize(&self, image: &DecodedImage) -> Result<Vec<TextObservation>> {
        let png = image.to_png_bytes()?;
        let png_len = jint_len(png.len())?;
        let (width, height) = (image.width(), image.height());

        let mut env = self.vm.attach_current_thread().map_err(|e| {
            OcrBridgeError::EngineFailure(format!("failed to attach JNI thread: {e}"))
        })?;

        tracing::info!(width, height, bytes = png.len(), "Android: submitting image to ML Kit");

        // -- Bitmap from the PNG bytes ------------------------------------------
        let bytes = env
            .byte_array_from_slice(&png)
            .map_err(|e| jni_err(&mut env, "byte_array_from_slice", e))?;
        let bitmap = env
            .call_static_method(
                "android/graphics/BitmapFactory",
                "decodeByteArray",
                "([BII)Landroid/graphics/Bitmap;",
                &[
                    JValue::Object(&bytes),
                    JValue::Int(0),
                    JValue::Int(png_len),
                ],
            )
            .and_then(|v| v.l())
            .map_err(|e| jni_err(&mut env, "BitmapFactory.decodeByteArray", e))?;
        if bitmap.is_null() {
            return Err(OcrBridgeError::EngineFailure(
                "BitmapFactory could not decode the image".into(),
            ));
        }

        let outcome = self.process_bitmap(&mut env, &bitmap, width, height);

        // Release pixel memory eagerly; ART would otherwise wait for a GC.
        if let Err(e) = env.call_method(&bitmap, "recycle", "()V", &[]) {
            let _ = take_exception(&mut env);
            tracing::debug!(error = %e, "Android: Bitmap.recycle failed");
        }
        outcome
    }

    fn process_bitmap(
        &self,
        env: &mut JNIEnv,
        bitmap: &JObject,
        width: u32,
        height: u32,
    ) -> Result<Vec<TextObservation>> {
        // -- InputImage.fromBitmap(bitmap, 0) -----------------------------------
        let input_image_class: &JClass = self.input_image_class.as_obj().into();
        let input = env
            .call_static_method(
                input_image_class,
                "fromBitmap",
                "(Landroid/graphics/Bitmap;I)Lcom/google/mlkit/vision/common/InputImage;",
                &[JValue::Object(bitmap), JValue::Int(0)],
            )
            .and_then(|v| v.l())
            .map_err(|e| jni_err(env, "InputImage.fromBitmap", e))?;

        // -- recognizer.process(input) → Task<Text> -----------------------------
        let task = env
            .call_method(
                self.client.as_obj(),
                "process",
                "(Lcom/google/mlkit/vision/common/InputImage;)Lcom/google/android/gms/tasks/Task;",
                &[JValue::Object(&input)],
            )
            .and_then(|v| v.l())
            .map_err(|e| jni_err(env, "TextRecognizer.process", e))?;

        // -- Tasks.await(task): blocks this worker until ML Kit answers ---------
        let tasks_class: &JClass = self.tasks_class.as_obj().into();
        let text = env
            .call_static_method(
                tasks_class,
                "await",
                "(Lcom/google/android/gms/tasks/Task;)Ljava/lang/Object;",
                &[JValue::Object(&task)],
            )
            .and_then(|v| v.l())
            .map_err(|e| jni_err(env, "ML Kit recognition", e))?;

        // -- Text.getTextBlocks() -----------------------------------------------
        let blocks = env
            .call_method(&text, "getTextBlocks", "()Ljava/util/List;", &[])
            .and_then(|v| v.l())
            .map_err(|e| jni_err(env, "Text.getTextBlocks", e))?;
        let count = env
            .call_method(&blocks, "size", "()I", &[])
            .and_then(|v| v.i())
            .map_err(|e| jni_err(env, "List.size", e))?;

        let mut observations = Vec::with_capacity(count.max(0) as usize);
        for index in 0..count {
            let block = env
                .call_method(&blocks, "get", "(I)Ljava/lang/Object;", &[JValue::Int(index)])
                .and_then(|v| v.l())
                .map_err(|e| jni_err(env, "List.get", e))?;

            let block_text = env
                .call_method(&block, "getText", "()Ljava/lang/String;", &[])
                .and_then(|v| v.l())
                .map_err(|e| jni_err(env, "TextBlock.getText", e))?;
            let block_text = JString::from(block_text);
            let block_text: String = env
                .get_string(&block_text)
                .map_err(|e| jni_err(env, "get_string(TextBlock.text)", e))?
                .into();

            let rect = env
                .call_method(&block, "getBoundingBox", "()Landroid/graphics/Rect;", &[])
                .and_then(|v| v.l())
                .map_err(|e| jni_err(env, "TextBlock.getBoundingBox", e))?;
            let bounding_box = if rect.is_null() {
                None
            } else {
                let mut edge = |name: &str| {
                    env.get_field(&rect, name, "I")
                        .and_then(|v| v.i())
                        .map(f64::from)
                        .map_err(|e| jni_err(env, "Rect field", e))
                };
                let (left, top, right, bottom) =
                    (edge("left")?, edge("top")?, edge("right")?, edge("bottom")?);
                NormalizedRect::from_pixel_edges(left, top, right, bottom, width, height)
            };

            observations.push(TextObservation {
                text: block_text,
                bounding_box,
                confidence: None,
            });

            // Keep the local reference table small on text-heavy pages.
            let _ = env.delete_local_ref(block);
        }

        tracing::debug!(count = observations.len(), "Android: text blocks received");
        Ok(observations)
    }
}

impl TextRecognizer for MlKitRecognizer {
    fn platform_name(&self) -> &str {
        "Android ML Kit"
    }

    fn recognize(
        &self,
        image: &DecodedImage,
        _region_hint: Option<&NormalizedRegion>,
    ) -> Result<Vec<TextObservation>> {
        match &self.inner {
            Ok(mlkit) => mlkit.recognize(image),
            Err(reason) => Err(OcrBridgeError::EngineFailure(reason.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ocrbridge_core::ErrorKind;

    #[test]
    fn byte_lengths_within_jint_pass_through() {
        assert_eq!(jint_len(0).unwrap(), 0);
        assert_eq!(jint_len(4096).unwrap(), 4096);
        assert_eq!(jint_len(i32::MAX as usize).unwrap(), i32::MAX);
    }

    #[test]
    fn oversized_payload_is_engine_failure() {
        let err = jint_len(i32::MAX as usize + 1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EngineFailure);
    }
}
