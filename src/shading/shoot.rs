//! The recursive shading function: finds the closest hit, evaluates its texture against the
//! scene's lights, and branches into reflection/transmission as the surface's finish demands.

use nalgebra::{Point3, RealField, Unit, Vector3};
use num_traits::ToPrimitive;

use crate::{
    config::{EPSILON, SHADOW_RAY_EPSILON_SCALE},
    error::Result,
    object::Intersection,
    rt::Ray,
    scene::Scene,
    shading::{Quality, ShadingState, TColor},
    traits::FallibleNumeric,
};

/// One level of the ray's enclosing-medium stack: entering a solid pushes a frame borrowing the
/// current one, leaving pops back to `parent`. Mirrors the source library's `rtstate->parent`
/// chain (`examples/original_source/libdimension/render/render.c:494-502`), without needing a
/// full parent-pointer `ShadingState` — only the IOR needs to survive a pop.
struct IorStack<'a, T> {
    ior: T,
    parent: Option<&'a IorStack<'a, T>>,
}

impl<'a, T: RealField + Copy> IorStack<'a, T> {
    /// The medium IOR at the top of `stack`, or vacuum (`1`) if the stack is empty.
    fn current(stack: Option<&Self>) -> T {
        stack.map_or_else(T::one, |frame| frame.ior)
    }
}

/// Cast `ray` into `scene` and return the color it sees.
///
/// `reclevel` is the remaining recursion budget (the render driver starts this at
/// `scene.reclimit`); `ior` is the index of refraction of the medium the ray currently travels
/// through; `adc_value` is the adaptive-depth-control intensity still available to this branch
/// (the render driver starts this at `1`, i.e. full budget); `reset` marks the first ray cast for
/// a given output pixel, so the BVH's last-hit cache rewinds its replay cursor.
///
/// # Errors
///
/// Returns an error if a numeric conversion fails, if the BVH traversal fails, or if a hit
/// distance turns out negative (a BVH/geometry invariant violation).
pub fn shoot<T: RealField + Copy + ToPrimitive>(scene: &Scene<T>, ray: &Ray<T>, reclevel: u32, ior: T, adc_value: T) -> Result<TColor<T>> {
    let root = IorStack { ior, parent: None };
    shoot_inner(scene, ray, reclevel, Some(&root), adc_value, true)
}

fn shoot_inner<T: RealField + Copy + ToPrimitive>(
    scene: &Scene<T>,
    ray: &Ray<T>,
    reclevel: u32,
    ior_stack: Option<&IorStack<'_, T>>,
    adc_value: T,
    reset: bool,
) -> Result<TColor<T>> {
    if reclevel == 0 || adc_value < scene.adc_bailout {
        return Ok(TColor::default());
    }
    let reclevel = reclevel - 1;

    let Some((index, hit)) = scene.intersect(ray, reset)? else {
        return Ok(trace_background(scene, ray));
    };

    let object = &scene.objects[index];
    let intersection = Intersection::new(ray.clone(), hit.distance, hit.interpolated_normal, index);
    let pigment_r = object.pigment_point(&intersection.point());
    let mut state = ShadingState::new(intersection, object.texture.clone(), object.interior, ray.direction, pigment_r)?;

    if !scene.quality.contains(Quality::PIGMENT) {
        state.pigment = TColor::default();
    }

    if scene.quality.contains(Quality::LIGHTS) {
        trace_lighting(scene, &mut state, reclevel, adc_value)?;
    }

    if scene.quality.contains(Quality::REFLECTION) && state.texture.finish.reflective > T::zero() {
        trace_reflection(scene, &mut state, reclevel, ior_stack, adc_value)?;
    }

    if scene.quality.contains(Quality::TRANSPARENCY) && state.pigment.trans > T::try_from_f64(EPSILON)? {
        trace_transparency(scene, &mut state, reclevel, ior_stack, adc_value)?;
    }

    Ok(state.color.clamp())
}

/// Evaluate the scene's background pigment in the ray's direction, for rays that hit nothing.
fn trace_background<T: RealField + Copy + ToPrimitive>(scene: &Scene<T>, ray: &Ray<T>) -> TColor<T> {
    let direction_point = Point3::from(ray.direction.into_inner());
    scene.background.evaluate(&direction_point)
}

/// Fraction of `light` that the reflection branch would independently contribute if traced from
/// this surface; subtracted from a light contribution before it is applied so that energy isn't
/// counted both here and in `trace_reflection` (spec §4.5(4), §9 Open Question iii).
fn reflected_fraction<T: RealField + Copy + ToPrimitive>(scene: &Scene<T>, state: &ShadingState<T>, light: &Vector3<T>) -> Vector3<T> {
    if scene.quality.contains(Quality::REFLECTION) {
        state.texture.finish.reflection(light, &state.pigment.color)
    } else {
        Vector3::zeros()
    }
}

/// Fraction of `light` that the transmission branch would independently contribute if traced from
/// this surface; subtracted for the same reason as [`reflected_fraction`].
fn transmitted_fraction<T: RealField + Copy + ToPrimitive>(scene: &Scene<T>, state: &ShadingState<T>, light: &Vector3<T>) -> Result<Vector3<T>> {
    let eps = T::try_from_f64(EPSILON)?;
    if scene.quality.contains(Quality::TRANSPARENCY) && state.pigment.trans >= eps {
        Ok(state.pigment.filter_illuminate(*light, |color| color.component_mul(light)))
    } else {
        Ok(Vector3::zeros())
    }
}

/// Accumulate the ambient term plus every light's diffuse/specular contribution, each attenuated
/// by a shadow feeler that may itself pass through transparent occluders.
///
/// Both the ambient term and each light's color have the energy the reflection and transmission
/// branches will separately contribute subtracted out *before* the diffuse/specular terms are
/// computed from what remains, matching the source library's subtraction ordering exactly
/// (`render.c:414-420` for ambient, `render.c:428-440` for the per-light loop) so that energy is
/// not double-counted between the lighting, reflection, and transmission branches. When
/// `Quality::FINISH` is unset, a light that reaches the surface at all replaces the accumulated
/// color with the flat, unweighted pigment color and stops iterating further lights, mirroring
/// `render.c:446-449`.
fn trace_lighting<T: RealField + Copy + ToPrimitive>(scene: &Scene<T>, state: &mut ShadingState<T>, reclevel: u32, adc_value: T) -> Result<()> {
    let normal = state.intersection.normal;
    let finish = state.texture.finish;

    let ambient_light = Vector3::from_element(finish.ambient);
    let ambient_reflected = reflected_fraction(scene, state, &ambient_light);
    let ambient_light = ambient_light - ambient_reflected;
    let ambient_transmitted = transmitted_fraction(scene, state, &ambient_light)?;
    let ambient_light = ambient_light - ambient_transmitted;
    state.color.color += ambient_light.component_mul(&state.pigment.color);

    for light in &scene.lights {
        let illumination = light.illuminate(&state.r)?;

        // Reject self-shadowing: a light behind the surface relative to the viewer contributes
        // nothing, matching the geometric-sign check against the viewer direction.
        let lit_side = illumination.direction.dot(&normal);
        let viewed_side = state.viewer.dot(&normal);
        if lit_side * viewed_side <= T::zero() {
            continue;
        }

        let eps = T::try_from_f64(EPSILON)?;
        let shadow_offset = eps * T::try_from_f64(SHADOW_RAY_EPSILON_SCALE)?;
        let shadow_origin = state.r + illumination.direction.scale(shadow_offset);
        let shadow_ray = Ray::new(shadow_origin, illumination.direction);

        let transmission = shadow_transmission(scene, &shadow_ray, illumination.distance, reclevel, adc_value)?;
        if transmission == Vector3::zeros() {
            continue;
        }
        let light_color = illumination.color.component_mul(&transmission);

        if !scene.quality.contains(Quality::FINISH) {
            state.color.color = state.pigment.color;
            break;
        }

        let specular = finish.specular(&light_color, &illumination.direction, &normal, &state.viewer)?;
        let light_color = light_color - specular;

        let reflected = reflected_fraction(scene, state, &light_color);
        let light_color = light_color - reflected;

        let transmitted = transmitted_fraction(scene, state, &light_color)?;
        let light_color = light_color - transmitted;

        let diffuse = finish.diffuse(&light_color, &state.pigment.color, &illumination.direction, &normal);

        state.color.color += specular;
        state.color.color += diffuse;
    }

    Ok(())
}

/// Follow a shadow ray toward a light, recursing through any transparent occluders it meets.
/// Returns the fraction of the light's color that ultimately reaches the surface (componentwise,
/// `1` meaning fully unoccluded).
fn shadow_transmission<T: RealField + Copy + ToPrimitive>(
    scene: &Scene<T>,
    ray: &Ray<T>,
    light_distance: Option<T>,
    reclevel: u32,
    adc_value: T,
) -> Result<Vector3<T>> {
    if reclevel == 0 || adc_value < scene.adc_bailout {
        return Ok(Vector3::zeros());
    }

    let Some((index, hit)) = scene.intersect(ray, false)? else {
        return Ok(Vector3::from_element(T::one()));
    };
    if let Some(distance) = light_distance {
        if hit.distance >= distance {
            return Ok(Vector3::from_element(T::one()));
        }
    }

    let object = &scene.objects[index];
    let point = ray.origin + ray.direction.scale(hit.distance);
    let pigment_r = object.pigment_point(&point);
    let pigment = object.texture.pigment.evaluate(&pigment_r);

    let eps = T::try_from_f64(EPSILON)?;
    if pigment.trans < eps {
        return Ok(Vector3::zeros());
    }

    let shadow_offset = eps * T::try_from_f64(SHADOW_RAY_EPSILON_SCALE)?;
    let next_origin = point + ray.direction.scale(shadow_offset);
    let next_ray = Ray::new(next_origin, ray.direction);
    let remaining_distance = light_distance.map(|distance| distance - hit.distance - shadow_offset);

    let beyond = shadow_transmission(scene, &next_ray, remaining_distance, reclevel - 1, adc_value * pigment.trans)?;
    Ok(pigment.filter_illuminate(beyond, |color| color.component_mul(&beyond)))
}

/// Shoot a mirror-reflected ray and add its attenuated contribution to `state.color`.
fn trace_reflection<T: RealField + Copy + ToPrimitive>(
    scene: &Scene<T>,
    state: &mut ShadingState<T>,
    reclevel: u32,
    ior_stack: Option<&IorStack<'_, T>>,
    adc_value: T,
) -> Result<()> {
    let finish = state.texture.finish;
    let offset = T::try_from_f64(EPSILON)? * T::try_from_f64(SHADOW_RAY_EPSILON_SCALE)?;
    let origin = state.r + state.reflected.scale(offset);
    let reflected_ray = Ray::new(origin, state.reflected);

    // A reflected ray stays in the medium it came from; the IOR stack passes through unchanged.
    let incoming = shoot_inner(scene, &reflected_ray, reclevel, ior_stack, adc_value * finish.reflective, false)?;
    state.color.color += finish.reflection(&incoming.color, &state.pigment.color);
    Ok(())
}

/// Refract a ray through the surface via Snell's law and add its attenuated, filtered
/// contribution to `state.color`. Total internal reflection contributes nothing.
///
/// Entering a solid (`cos_incidence < 0`) pushes the object's interior IOR onto `ior_stack`;
/// leaving one pops back to whatever medium enclosed it (vacuum if none), exactly as
/// `render.c:494-502` recovers `state->parent->ior` on exit rather than hardcoding vacuum.
fn trace_transparency<T: RealField + Copy + ToPrimitive>(
    scene: &Scene<T>,
    state: &mut ShadingState<T>,
    reclevel: u32,
    ior_stack: Option<&IorStack<'_, T>>,
    adc_value: T,
) -> Result<()> {
    let direction = state.intersection.ray.direction;
    let mut normal = state.intersection.normal;

    let cos_incidence = direction.dot(&normal);
    let old_ior = IorStack::current(ior_stack);

    let mut entered_frame: Option<IorStack<'_, T>> = None;
    let (new_ior, next_stack): (T, Option<&IorStack<'_, T>>) = if cos_incidence < T::zero() {
        // Entering the solid: push its interior IOR, remembering the medium we came from.
        entered_frame = Some(IorStack {
            ior: state.interior.ior,
            parent: ior_stack,
        });
        (state.interior.ior, entered_frame.as_ref())
    } else {
        // Leaving the solid: flip the normal to face the ray, and pop back to whichever medium
        // enclosed it (vacuum if this was the outermost surface).
        normal = Unit::new_unchecked(-normal.into_inner());
        let outer = ior_stack.and_then(|frame| frame.parent);
        (IorStack::current(outer), outer)
    };

    let iorr = old_ior / new_ior;
    let cos_incidence = direction.dot(&normal);
    let sin2_transmitted = iorr * iorr * (T::one() - cos_incidence * cos_incidence);
    if sin2_transmitted > T::one() {
        // Total internal reflection: no transmitted contribution.
        return Ok(());
    }

    let cos_transmitted = (T::one() - sin2_transmitted).sqrt();
    let refracted_vector = direction.scale(iorr) - normal.scale(iorr * cos_incidence + cos_transmitted);
    let refracted = Unit::new_normalize(refracted_vector);

    let offset = T::try_from_f64(EPSILON)? * T::try_from_f64(SHADOW_RAY_EPSILON_SCALE)?;
    let origin = state.r + refracted.scale(offset);
    let refracted_ray = Ray::new(origin, refracted);

    let incoming = shoot_inner(scene, &refracted_ray, reclevel, next_stack, adc_value * state.pigment.trans, false)?;
    let transmitted = state.pigment.filter_illuminate(incoming.color, |color| color.component_mul(&incoming.color));
    state.color.color += transmitted;
    Ok(())
}
