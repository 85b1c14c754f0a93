use bevy::input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel};
use bevy::math::EulerRot;
use bevy::prelude::*;

use crate::engine::assets::bounds::SiteBounds;
use crate::engine::camera::nav_lock::CameraNavLock;
use crate::engine::scene::heightmap::sample_heightmap_bilinear;

/// Scripted camera move: fixed destination and orientation over a fixed
/// duration, smoothstep-eased. Cancelled by any enabled user input.
#[derive(Debug, Clone, Copy)]
pub struct CameraFlight {
    start_pos: Vec3,
    start_yaw: f32,
    start_pitch: f32,
    end_pos: Vec3,
    end_yaw: f32,
    end_pitch: f32,
    duration: f32,
    elapsed: f32,
}

#[derive(Resource)]
pub struct ViewportCamera {
    pub focus_point: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    /// Rough eye height above ground, drives movement and raycast step sizes.
    pub height: f32,
    pub ground_height: f32,
    pub last_mouse_pos: Vec2,
    // Temporal smoothing of terrain intersections to reduce drag jitter
    pub last_intersection: Option<Vec3>,
    pub intersection_smooth_factor: f32,
    flight: Option<CameraFlight>,
}

impl Default for ViewportCamera {
    fn default() -> Self {
        Self {
            focus_point: Vec3::new(0.0, 150.0, 300.0),
            yaw: 0.0,
            pitch: -0.5,
            height: 150.0,
            ground_height: 0.0,
            last_mouse_pos: Vec2::ZERO,
            last_intersection: None,
            intersection_smooth_factor: 0.15,
            flight: None,
        }
    }
}

impl ViewportCamera {
    /// Begin a flight to `destination` with a heading (radians clockwise from
    /// north) and pitch. Heading maps to yaw as -heading: yaw 0 faces -Z,
    /// which is north in the site frame.
    pub fn fly_to(&mut self, destination: Vec3, heading: f32, pitch: f32, duration: f32) {
        self.flight = Some(CameraFlight {
            start_pos: self.focus_point,
            start_yaw: self.yaw,
            start_pitch: self.pitch,
            end_pos: destination,
            end_yaw: -heading,
            end_pitch: pitch,
            duration: duration.max(f32::EPSILON),
            elapsed: 0.0,
        });
    }

    /// Fly to a vantage that frames the given bounds: pulled back south of
    /// the centre at 45 degrees, looking north down onto it.
    pub fn frame_bounds(&mut self, bounds: &SiteBounds, duration: f32) {
        let center = bounds.center();
        let distance = bounds.size().length().max(50.0) * 0.8;
        let eye = center + Vec3::new(0.0, distance * 0.7, distance * 0.7);
        self.fly_to(eye, 0.0, -std::f32::consts::FRAC_PI_4, duration);
    }

    pub fn flight_active(&self) -> bool {
        self.flight.is_some()
    }

    pub fn cancel_flight(&mut self) {
        self.flight = None;
    }

    /// Advance the active flight, returning the interpolated pose.
    fn advance_flight(&mut self, dt: f32) -> Option<(Vec3, f32, f32)> {
        let flight = self.flight.as_mut()?;
        flight.elapsed += dt;
        let t = (flight.elapsed / flight.duration).clamp(0.0, 1.0);
        let eased = t * t * (3.0 - 2.0 * t);

        let pos = flight.start_pos.lerp(flight.end_pos, eased);
        let yaw = flight.start_yaw + (flight.end_yaw - flight.start_yaw) * eased;
        let pitch = flight.start_pitch + (flight.end_pitch - flight.start_pitch) * eased;

        if t >= 1.0 {
            self.flight = None;
        }
        Some((pos, yaw, pitch))
    }

    /// Cast a ray through a viewport position onto the terrain. Returns the
    /// smoothed intersection, or `None` when the ray leaves the scene (sky).
    pub fn mouse_to_terrain(
        &mut self,
        cursor_pos: Vec2,
        camera: &Camera,
        camera_transform: &GlobalTransform,
        heightmap_image: Option<&Image>,
        bounds: &SiteBounds,
    ) -> Option<Vec3> {
        let ray = camera
            .viewport_to_world(camera_transform, cursor_pos)
            .ok()?;

        let intersection = if let Some(heightmap) = heightmap_image {
            self.precise_heightmap_intersection(&ray, heightmap, bounds)
        } else {
            self.flat_plane_intersection(&ray)
        };

        match (intersection, self.last_intersection) {
            (Some(new_pos), Some(last_pos)) => {
                let smoothed = last_pos.lerp(new_pos, self.intersection_smooth_factor);
                self.last_intersection = Some(smoothed);
                Some(smoothed)
            }
            (Some(new_pos), None) => {
                self.last_intersection = Some(new_pos);
                Some(new_pos)
            }
            _ => None,
        }
    }

    fn precise_heightmap_intersection(
        &self,
        ray: &Ray3d,
        heightmap_image: &Image,
        bounds: &SiteBounds,
    ) -> Option<Vec3> {
        // Adaptive march: coarse steps scaled by camera height, fine steps
        // near the crossing, binary refinement at the end.
        let base_step = (self.height * 0.01).clamp(0.1, 2.0);
        let mut t = 0.0;
        let max_distance = (self.height * 3.0).max(500.0);
        let mut last_height_diff = f32::INFINITY;

        while t < max_distance {
            let test_point = ray.origin + ray.direction * t;

            if bounds.contains_xz(test_point.x, test_point.z) {
                let norm_x = ((test_point.x as f64 - bounds.min_x)
                    / (bounds.max_x - bounds.min_x)) as f32;
                let norm_z = ((test_point.z as f64 - bounds.min_z)
                    / (bounds.max_z - bounds.min_z)) as f32;

                let terrain_height =
                    sample_heightmap_bilinear(heightmap_image, norm_x, norm_z, bounds);
                let height_diff = test_point.y - terrain_height;

                if height_diff <= 0.0 {
                    if last_height_diff.is_finite() && last_height_diff > 0.0 {
                        let refined_t = self.binary_search_intersection(
                            ray,
                            t - base_step,
                            t,
                            heightmap_image,
                            bounds,
                            5,
                        );
                        let p = ray.origin + ray.direction * refined_t;
                        let y = sample_terrain(heightmap_image, p, bounds);
                        return Some(Vec3::new(p.x, y, p.z));
                    }
                    return Some(Vec3::new(test_point.x, terrain_height, test_point.z));
                }
                last_height_diff = height_diff;
            }

            let step_size = if last_height_diff.is_finite() && last_height_diff < base_step * 2.0 {
                base_step * 0.1
            } else {
                base_step
            };
            t += step_size;
        }

        None
    }

    fn binary_search_intersection(
        &self,
        ray: &Ray3d,
        t_start: f32,
        t_end: f32,
        heightmap_image: &Image,
        bounds: &SiteBounds,
        iterations: usize,
    ) -> f32 {
        let mut low = t_start;
        let mut high = t_end;

        for _ in 0..iterations {
            let mid = (low + high) * 0.5;
            let test_point = ray.origin + ray.direction * mid;

            if bounds.contains_xz(test_point.x, test_point.z) {
                let terrain_height = sample_terrain(heightmap_image, test_point, bounds);
                if test_point.y > terrain_height {
                    low = mid;
                } else {
                    high = mid;
                }
            } else {
                low = mid;
            }
        }

        (low + high) * 0.5
    }

    fn flat_plane_intersection(&self, ray: &Ray3d) -> Option<Vec3> {
        let plane_y = self.ground_height;
        if ray.direction.y.abs() < 0.001 {
            return None;
        }
        let t = (plane_y - ray.origin.y) / ray.direction.y;
        if t > 0.0 {
            Some(ray.origin + ray.direction * t)
        } else {
            None
        }
    }
}

fn sample_terrain(heightmap_image: &Image, p: Vec3, bounds: &SiteBounds) -> f32 {
    let norm_x = ((p.x as f64 - bounds.min_x) / (bounds.max_x - bounds.min_x)) as f32;
    let norm_z = ((p.z as f64 - bounds.min_z) / (bounds.max_z - bounds.min_z)) as f32;
    sample_heightmap_bilinear(heightmap_image, norm_x, norm_z, bounds)
}

/// Free-fly viewport camera. Each input class is gated on its navigation
/// flag, so an armed tower drag (which takes the nav lock) freezes the
/// camera until pointer-up restores the flags.
pub fn camera_controller(
    mut camera_query: Query<&mut Transform, With<Camera3d>>,
    mut viewport_camera: ResMut<ViewportCamera>,
    nav_lock: Res<CameraNavLock>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: EventReader<MouseMotion>,
    mut scroll_events: EventReader<MouseWheel>,
    mut cursor_moved: EventReader<CursorMoved>,
    keyboard: Res<ButtonInput<KeyCode>>,
    time: Res<Time>,
) {
    let Ok(mut camera_transform) = camera_query.single_mut() else {
        return;
    };

    for cursor in cursor_moved.read() {
        viewport_camera.last_mouse_pos = cursor.position;
    }

    // Drain inputs first so a locked frame does not replay stale events later.
    let mouse_delta: Vec2 = mouse_motion.read().map(|m| m.delta).sum();
    let mut scroll_accum = 0.0;
    for ev in scroll_events.read() {
        scroll_accum += match ev.unit {
            MouseScrollUnit::Line => ev.y * 1.0,
            MouseScrollUnit::Pixel => ev.y * 0.05,
        };
    }

    let flags = nav_lock.flags();
    let mut user_moved = false;

    // Mouse look with right button
    if flags.look && mouse_button.pressed(MouseButton::Right) && mouse_delta != Vec2::ZERO {
        let yaw_sens = 0.0035;
        let pitch_sens = 0.0030;
        viewport_camera.yaw += -mouse_delta.x * yaw_sens;
        viewport_camera.pitch += -mouse_delta.y * pitch_sens;
        viewport_camera.pitch = viewport_camera.pitch.clamp(-1.55, 1.55);
        user_moved = true;
    }

    // Yaw with arrow keys
    if flags.rotate {
        let mut rotate_input = 0.0;
        if keyboard.pressed(KeyCode::ArrowLeft) {
            rotate_input += 1.0;
        }
        if keyboard.pressed(KeyCode::ArrowRight) {
            rotate_input -= 1.0;
        }
        if rotate_input != 0.0 {
            viewport_camera.yaw += rotate_input * 1.2 * time.delta_secs();
            user_moved = true;
        }
    }

    // Wheel dolly along the view direction
    if flags.zoom && scroll_accum.abs() > f32::EPSILON {
        let dolly_speed = (viewport_camera.height * 0.2).clamp(0.5, 500.0);
        let view_rot = Quat::from_euler(
            EulerRot::YXZ,
            viewport_camera.yaw,
            viewport_camera.pitch,
            0.0,
        );
        let forward = (view_rot * Vec3::Z).normalize();
        viewport_camera.focus_point -= forward * (scroll_accum * dolly_speed);
        user_moved = true;
    }

    // Horizontal translation with WASD, vertical tilt-dolly with Q/E
    let mut move_input = Vec3::ZERO;
    if flags.translate {
        if keyboard.pressed(KeyCode::KeyW) {
            move_input.z -= 1.0;
        }
        if keyboard.pressed(KeyCode::KeyS) {
            move_input.z += 1.0;
        }
        if keyboard.pressed(KeyCode::KeyD) {
            move_input.x += 1.0;
        }
        if keyboard.pressed(KeyCode::KeyA) {
            move_input.x -= 1.0;
        }
    }
    if flags.tilt {
        if keyboard.pressed(KeyCode::KeyE) {
            move_input.y += 1.0;
        }
        if keyboard.pressed(KeyCode::KeyQ) {
            move_input.y -= 1.0;
        }
    }

    if move_input != Vec3::ZERO {
        let view_rot = Quat::from_euler(
            EulerRot::YXZ,
            viewport_camera.yaw,
            viewport_camera.pitch,
            0.0,
        );
        let forward = (view_rot * Vec3::Z).normalize();
        let right = (view_rot * Vec3::X).normalize();
        let up = Vec3::Y;

        // shift = faster, ctrl = slower
        let mut speed = (viewport_camera.height * 1.0).clamp(2.0, 200.0);
        if keyboard.any_pressed([KeyCode::ShiftLeft, KeyCode::ShiftRight]) {
            speed *= 3.5;
        }
        if keyboard.any_pressed([KeyCode::ControlLeft, KeyCode::ControlRight]) {
            speed *= 0.25;
        }

        let world_delta = right * move_input.x + up * move_input.y + forward * move_input.z;
        viewport_camera.focus_point += world_delta.normalize() * speed * time.delta_secs();
        user_moved = true;
    }

    // User input overrides any scripted flight
    if user_moved {
        viewport_camera.cancel_flight();
    }

    let (target_pos, target_yaw, target_pitch) =
        match viewport_camera.advance_flight(time.delta_secs()) {
            Some(pose) => pose,
            None => (
                viewport_camera.focus_point,
                viewport_camera.yaw,
                viewport_camera.pitch,
            ),
        };
    viewport_camera.focus_point = target_pos;
    viewport_camera.yaw = target_yaw;
    viewport_camera.pitch = target_pitch;
    viewport_camera.height =
        (viewport_camera.focus_point.y - viewport_camera.ground_height).max(1.0);

    let target_rot = Quat::from_euler(EulerRot::YXZ, target_yaw, target_pitch, 0.0);
    let lerp_speed = (12.0 * time.delta_secs()).min(1.0);
    camera_transform.translation = camera_transform.translation.lerp(target_pos, lerp_speed);
    camera_transform.rotation = camera_transform.rotation.slerp(target_rot, lerp_speed);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flight_reaches_destination_and_clears() {
        let mut camera = ViewportCamera::default();
        camera.fly_to(Vec3::new(10.0, 20.0, 30.0), 0.0, -0.5, 1.0);
        assert!(camera.flight_active());

        let mut pose = None;
        for _ in 0..20 {
            if let Some(p) = camera.advance_flight(0.1) {
                pose = Some(p);
            }
        }
        let (pos, _, pitch) = pose.unwrap();
        assert!((pos - Vec3::new(10.0, 20.0, 30.0)).length() < 1e-3);
        assert!((pitch + 0.5).abs() < 1e-5);
        assert!(!camera.flight_active());
    }

    #[test]
    fn heading_maps_to_negative_yaw() {
        let mut camera = ViewportCamera::default();
        camera.yaw = 0.3;
        camera.fly_to(Vec3::ZERO, std::f32::consts::FRAC_PI_2, -0.5, 0.1);
        let mut yaw = camera.yaw;
        while let Some((_, y, _)) = camera.advance_flight(0.05) {
            yaw = y;
        }
        assert!((yaw + std::f32::consts::FRAC_PI_2).abs() < 1e-4);
    }
}
